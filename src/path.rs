use std::fmt;

/// Dotted path from the root scope to a symbol.
///
/// Every symbol stores the path of its enclosing scope as a non-owning
/// back-reference. It is used for diagnostics and for walking upward during
/// lexical lookup, never for lifetime management.
///
/// # Examples
///
/// ```
/// use emplode::SymbolPath;
///
/// let count = SymbolPath::from_dotted("counter.count");
/// assert_eq!(count.to_string(), "counter.count");
/// assert_eq!(count.name(), Some("count"));
/// assert_eq!(count.parent(), Some(SymbolPath::from_dotted("counter")));
///
/// // The root scope has the empty path
/// assert!(SymbolPath::root().is_root());
/// assert_eq!(SymbolPath::root().child("counter").to_string(), "counter");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SymbolPath {
    segments: Vec<String>,
}

impl SymbolPath {
    /// The path of the root scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create from individual segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted path (e.g., "main.select.top_count").
    ///
    /// Empty segments are dropped, so "" and "." are the root path.
    pub fn from_dotted(s: &str) -> Self {
        Self::from_segments(s.split('.').filter(|p| !p.is_empty()))
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of a child of this one.
    ///
    /// Example: `main` + `select` = `main.select`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Path of the enclosing scope. `None` for the root.
    ///
    /// Example: `main.select` -> Some(`main`) -> Some(root) -> None
    pub fn parent(&self) -> Option<Self> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// Split into the enclosing path and the final name.
    pub fn split_last(&self) -> Option<(Self, &str)> {
        let (name, parent) = self.segments.split_last()?;
        Some((
            Self {
                segments: parent.to_vec(),
            },
            name,
        ))
    }

    /// Whether `other` is this path or lies below it.
    pub fn is_prefix_of(&self, other: &SymbolPath) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for SymbolPath {
    fn from(s: &str) -> Self {
        Self::from_dotted(s)
    }
}

impl From<String> for SymbolPath {
    fn from(s: String) -> Self {
        Self::from_dotted(&s)
    }
}
