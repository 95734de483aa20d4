use std::fmt;
use std::str::FromStr;

use crate::parse::{ParseError, parse_path};

/// A non-empty, dot-separated document path such as `"a.b.c"`.
///
/// Equality and prefix checks compare whole components, so `"a.b"` prefixes
/// `"a.b.c"` but not `"a.bc"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    components: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for empty paths or empty components.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_path(input).map(|components| Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false`: a parsed path has at least one component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The final component, i.e. the field name the path terminates in.
    #[must_use]
    pub fn last(&self) -> &str {
        self.components.last().map_or("", String::as_str)
    }

    /// Whether `self` equals `other` or is a strict prefix of it.
    #[must_use]
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        other.components.starts_with(&self.components)
    }

    /// Whether the two paths would claim overlapping encryption scopes.
    #[must_use]
    pub fn conflicts_with(&self, other: &FieldPath) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl FromStr for FieldPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("."))
    }
}
