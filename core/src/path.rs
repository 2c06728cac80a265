//! Field paths.
//!
//! A field path is the dot-separated sequence of property names leading from
//! a domain root to a nested field, e.g. `address.country`. The empty path
//! denotes the root itself.

use std::fmt;

/// A dot-separated path from the domain root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The path of the domain root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Empty segments are ignored.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The path of a property on the object at this path.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// The final property name, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if `other` is this path or lies beneath it.
    ///
    /// Matching is segment aligned: `address` covers `address.country` but
    /// not `addressBook`.
    pub fn covers(&self, other: &FieldPath) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        *self == FieldPath::parse(other)
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        *self == FieldPath::parse(other)
    }
}
