//! Configuration of scope value-copy behavior.

/// How a scope copies values from another scope.
///
/// Set per scope and inherited by the scopes and objects created through
/// that scope's factory operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CopyPolicy {
    /// Copy every child present under the same name on both sides; children
    /// present on only one side are left untouched.
    #[default]
    MatchingNames,
    /// Both scopes must have exactly the same child names, recursively.
    /// A mismatch rejects the copy before anything is mutated.
    SameShape,
}

impl CopyPolicy {
    /// Whether this policy requires matching shapes.
    pub fn requires_same_shape(self) -> bool {
        matches!(self, CopyPolicy::SameShape)
    }
}
