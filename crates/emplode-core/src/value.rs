//! Scalar values held by configuration entries.
//!
//! - [`Value`] - dynamically typed scalar payload
//! - [`ValueKind`] - the kind a scalar is fixed to
//! - [`ScalarType`] - Rust types that can back a linked scalar

use std::fmt;

use crate::AccessError;

/// The kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Double,
    /// UTF-8 string
    String,
}

impl ValueKind {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar configuration value.
///
/// # Example
///
/// ```
/// use emplode_core::{Value, ValueKind};
///
/// let five = Value::from(5);
/// assert_eq!(five.kind(), ValueKind::Int);
/// assert_eq!(five.convert(ValueKind::Double), Some(Value::Double(5.0)));
/// assert_eq!(Value::from("12").convert(ValueKind::Int), Some(Value::Int(12)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Double(f64),
    /// String value
    String(String),
}

impl Value {
    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Convert this value to another kind.
    ///
    /// Numbers convert between each other (doubles truncate toward zero),
    /// booleans convert to and from `0`/`1`, everything renders to a string
    /// and strings parse back. Returns `None` when the conversion has no
    /// sensible result: `"abc"` as an int, or a double that is non-finite
    /// or outside the `i64` range as an int.
    pub fn convert(&self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        match (self, kind) {
            (_, ValueKind::String) => Some(Value::String(self.to_string())),

            (Value::Int(i), ValueKind::Double) => Some(Value::Double(*i as f64)),
            (Value::Int(i), ValueKind::Bool) => Some(Value::Bool(*i != 0)),

            (Value::Double(d), ValueKind::Int) => {
                let t = d.trunc();
                // Half-open: 2^63 is not an i64.
                if (I64_LOWER..I64_UPPER).contains(&t) {
                    Some(Value::Int(t as i64))
                } else {
                    None
                }
            }
            (Value::Double(d), ValueKind::Bool) => Some(Value::Bool(*d != 0.0)),

            (Value::Bool(b), ValueKind::Int) => Some(Value::Int(i64::from(*b))),
            (Value::Bool(b), ValueKind::Double) => Some(Value::Double(if *b { 1.0 } else { 0.0 })),

            (Value::String(s), ValueKind::Int) => s.trim().parse().ok().map(Value::Int),
            (Value::String(s), ValueKind::Double) => s.trim().parse().ok().map(Value::Double),
            (Value::String(s), ValueKind::Bool) => match s.trim() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },

            _ => None,
        }
    }

    /// Get the integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the double payload, if this is a `Double`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = -(i64::MIN as f64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

// ============================================================================
// ScalarType
// ============================================================================

/// Rust types that can back a scalar configuration entry.
///
/// Implemented for the primitive types host modules typically expose. The
/// conversion back from a [`Value`] goes through [`Value::convert`] and then
/// range-checks, so assigning `-1` into a `usize` field fails instead of
/// wrapping. The other direction is checked too: a `u64` above `i64::MAX`
/// has no [`Value`] and reads of it fail.
pub trait ScalarType: Clone + Send + Sync + fmt::Debug + 'static {
    /// Kind of value this type stores.
    const KIND: ValueKind;

    /// Name used in diagnostics.
    fn type_name() -> &'static str;

    /// Convert into a dynamic value, if representable.
    fn to_value(&self) -> Option<Value>;

    /// Convert from a dynamic value, if representable.
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert into a dynamic value, failing with
    /// [`AccessError::Conversion`] when it does not fit.
    fn checked_value(&self) -> Result<Value, AccessError> {
        self.to_value().ok_or_else(|| AccessError::Conversion {
            value: format!("{self:?}"),
            kind: Self::KIND,
        })
    }
}

/// Helper macro to implement ScalarType for integer types.
macro_rules! impl_scalar_int {
    ($rust_ty:ty, $name:literal) => {
        impl ScalarType for $rust_ty {
            const KIND: ValueKind = ValueKind::Int;

            fn type_name() -> &'static str {
                $name
            }

            fn to_value(&self) -> Option<Value> {
                i64::try_from(*self).ok().map(Value::Int)
            }

            fn from_value(value: &Value) -> Option<Self> {
                let i = value.convert(ValueKind::Int)?.as_int()?;
                <$rust_ty>::try_from(i).ok()
            }
        }
    };
}

impl_scalar_int!(i32, "int32");
impl_scalar_int!(i64, "int64");
impl_scalar_int!(u32, "uint32");
impl_scalar_int!(u64, "uint64");
impl_scalar_int!(usize, "size_t");

/// `From<T> for Value` for integer types that always fit in an `i64`.
macro_rules! impl_value_from_int {
    ($($rust_ty:ty),*) => {
        $(
            impl From<$rust_ty> for Value {
                fn from(value: $rust_ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_value_from_int!(i32, i64, u32);

impl ScalarType for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn type_name() -> &'static str {
        "double"
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Double(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.convert(ValueKind::Double)?.as_double()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl ScalarType for f32 {
    const KIND: ValueKind = ValueKind::Double;

    fn type_name() -> &'static str {
        "float"
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Double(f64::from(*self)))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .convert(ValueKind::Double)?
            .as_double()
            .map(|d| d as f32)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl ScalarType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn type_name() -> &'static str {
        "bool"
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.convert(ValueKind::Bool)?.as_bool()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl ScalarType for String {
    const KIND: ValueKind = ValueKind::String;

    fn type_name() -> &'static str {
        "string"
    }

    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.convert(ValueKind::String)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(ValueKind::Bool.name(), "bool");
        assert_eq!(ValueKind::Int.name(), "int");
        assert_eq!(ValueKind::Double.name(), "double");
        assert_eq!(ValueKind::String.name(), "string");
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(Value::Int(3).convert(ValueKind::Double), Some(Value::Double(3.0)));
        assert_eq!(Value::Double(3.9).convert(ValueKind::Int), Some(Value::Int(3)));
        assert_eq!(Value::Double(-3.9).convert(ValueKind::Int), Some(Value::Int(-3)));
        assert_eq!(Value::Double(f64::NAN).convert(ValueKind::Int), None);
    }

    #[test]
    fn out_of_range_double_does_not_saturate() {
        assert_eq!(Value::Double(1e30).convert(ValueKind::Int), None);
        assert_eq!(Value::Double(-1e30).convert(ValueKind::Int), None);
        assert_eq!(Value::Double(2f64.powi(63)).convert(ValueKind::Int), None);
        assert_eq!(
            Value::Double(-(2f64.powi(63))).convert(ValueKind::Int),
            Some(Value::Int(i64::MIN))
        );
        assert_eq!(i64::from_value(&Value::Double(1e30)), None);
    }

    #[test]
    fn bool_conversions() {
        assert_eq!(Value::Int(0).convert(ValueKind::Bool), Some(Value::Bool(false)));
        assert_eq!(Value::Int(7).convert(ValueKind::Bool), Some(Value::Bool(true)));
        assert_eq!(Value::Bool(true).convert(ValueKind::Int), Some(Value::Int(1)));
        assert_eq!(Value::from("true").convert(ValueKind::Bool), Some(Value::Bool(true)));
        assert_eq!(Value::from("yes").convert(ValueKind::Bool), None);
    }

    #[test]
    fn string_conversions() {
        assert_eq!(Value::Int(42).convert(ValueKind::String), Some(Value::from("42")));
        assert_eq!(Value::from(" 42 ").convert(ValueKind::Int), Some(Value::Int(42)));
        assert_eq!(Value::from("2.5").convert(ValueKind::Double), Some(Value::Double(2.5)));
        assert_eq!(Value::from("fitness").convert(ValueKind::Int), None);
    }

    #[test]
    fn scalar_type_range_checks() {
        assert_eq!(usize::from_value(&Value::Int(4)), Some(4));
        assert_eq!(usize::from_value(&Value::Int(-1)), None);
        assert_eq!(i32::from_value(&Value::Int(i64::MAX)), None);
        assert_eq!(u32::from_value(&Value::Double(7.0)), Some(7));
    }

    #[test]
    fn scalar_type_round_trip() {
        assert_eq!(String::from_value(&"fitness".to_string().to_value().unwrap()), Some("fitness".to_string()));
        assert_eq!(f64::from_value(&Value::Int(2)), Some(2.0));
        assert_eq!(bool::KIND, ValueKind::Bool);
        assert_eq!(usize::type_name(), "size_t");
    }

    #[test]
    fn wide_unsigned_does_not_saturate() {
        assert_eq!(u64::MAX.to_value(), None);
        assert_eq!(usize::MAX.to_value(), None);
        assert_eq!((i64::MAX as u64).to_value(), Some(Value::Int(i64::MAX)));
        assert_eq!(
            u64::MAX.checked_value(),
            Err(AccessError::Conversion {
                value: u64::MAX.to_string(),
                kind: ValueKind::Int
            })
        );
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(5i32), Value::Int(5));
        assert_eq!(Value::from(5u32), Value::Int(5));
        assert_eq!(Value::from(1.5f64), Value::Double(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
    }
}
