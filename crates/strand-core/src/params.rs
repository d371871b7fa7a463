//! Path parameter bindings.

/// Synthetic binding name used for a wildcard segment.
pub const WILDCARD_NAME: &str = "*";

/// Parameter bindings extracted while matching one route against one path.
///
/// Bindings are ordered `(name, value)` pairs. Keys are unique in practice
/// (a pattern does not repeat parameter names); if a pattern does repeat a
/// name, the first binding wins on lookup. The bindings live for exactly
/// one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding by name.
    ///
    /// An optional parameter that matched zero segments is bound to the
    /// empty string, so handlers can consult it without a separate
    /// existence check.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a binding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no bindings exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Drop all bindings past `len`. Used by the matcher to undo a
    /// speculative walk when backtracking.
    pub fn truncate(&mut self, len: usize) {
        self.pairs.truncate(len);
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Iterate over bindings in the order they were produced.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
