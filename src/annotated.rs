//! Values that remember where they came from in the arch file.
//!
//! Every field of the decoded specification is wrapped in [`Annotated`] so that
//! validation warnings can point at an exact line of the original document.

use serde::Serialize;
use std::fmt;

/// Position of a value inside the arch document.
///
/// `path` uses a JSONPath-like notation (`$.deps.api.mayDependOn[1]`). `line`
/// is 1-based and only present when the value could be located in the source
/// text. `excerpt` is a plain-text rendering of the surrounding lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<String>,
}

impl Reference {
    pub fn new(path: impl Into<String>, line: Option<usize>, excerpt: Option<String>) -> Self {
        Self {
            path: path.into(),
            line,
            excerpt,
        }
    }

    /// Reference to a document path that has no backing source text.
    pub fn unresolved(path: impl Into<String>) -> Self {
        Self::new(path, None, None)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    pub fn is_located(&self) -> bool {
        self.line.is_some()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.path, line),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Anything that can point back into the arch document.
pub trait Located {
    fn location(&self) -> &Reference;
}

/// A decoded value paired with its [`Reference`]. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotated<T> {
    value: T,
    location: Reference,
}

impl<T> Annotated<T> {
    pub fn new(value: T, location: Reference) -> Self {
        Self { value, location }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Copy> Annotated<T> {
    /// Copy out the wrapped value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl Annotated<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> Located for Annotated<T> {
    fn location(&self) -> &Reference {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display_with_line() {
        let reference = Reference::new("$.deps.api", Some(12), None);
        assert_eq!(reference.to_string(), "$.deps.api (line 12)");
        assert!(reference.is_located());
    }

    #[test]
    fn test_reference_display_unresolved() {
        let reference = Reference::unresolved("$.vendors");
        assert_eq!(reference.to_string(), "$.vendors");
        assert_eq!(reference.line(), None);
        assert_eq!(reference.excerpt(), None);
    }

    #[test]
    fn test_annotated_accessors() {
        let value = Annotated::new(true, Reference::unresolved("$.allow.depOnAnyVendor"));
        assert!(value.get());
        assert_eq!(value.location().path(), "$.allow.depOnAnyVendor");

        let name = Annotated::new("core".to_string(), Reference::unresolved("$.x"));
        assert_eq!(name.as_str(), "core");
        assert_eq!(name.into_value(), "core");
    }

    #[test]
    fn test_reference_serializes_without_missing_fields() {
        let json = serde_json::to_value(Reference::unresolved("$.version")).unwrap();
        assert_eq!(json, serde_json::json!({ "path": "$.version" }));
    }
}
