//! Core types for position mapping

use serde::{Deserialize, Serialize};

/// A line and column in some text
///
/// Used for generated positions and for fragment anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

/// A position in some upstream source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginalPosition {
    /// Path or identifier of the source
    pub source: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl OriginalPosition {
    pub fn new(source: impl Into<String>, line: usize, column: usize) -> Self {
        OriginalPosition {
            source: source.into(),
            line,
            column,
        }
    }
}

/// One entry of a position map
///
/// A mapping without an original position marks generated text that has no
/// upstream counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub generated: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<OriginalPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mapping {
    /// Create a mapping from a generated position to an original one
    pub fn new(generated: Position, original: OriginalPosition) -> Self {
        Mapping {
            generated,
            original: Some(original),
            name: None,
        }
    }

    /// Create a mapping that only marks a generated position
    pub fn generated_only(generated: Position) -> Self {
        Mapping {
            generated,
            original: None,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let p1 = Position::new(1, 0);
        let p2 = Position::new(1, 5);
        let p3 = Position::new(2, 0);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert!(p1 < p3);
    }

    #[test]
    fn test_position_equality() {
        assert_eq!(Position::new(3, 4), Position { line: 3, column: 4 });
        assert_ne!(Position::new(3, 4), Position::new(4, 3));
    }

    #[test]
    fn test_mapping_constructors() {
        let mapping = Mapping::new(Position::new(1, 0), OriginalPosition::new("a.js", 2, 3));
        assert_eq!(mapping.original.as_ref().unwrap().source, "a.js");
        assert!(mapping.name.is_none());

        let named = mapping.clone().with_name("foo");
        assert_eq!(named.name.as_deref(), Some("foo"));

        let bare = Mapping::generated_only(Position::new(4, 2));
        assert!(bare.original.is_none());
    }

    #[test]
    fn test_serialization_mapping() {
        let mapping = Mapping::new(Position::new(10, 2), OriginalPosition::new("src/x.js", 1, 0));
        let json = serde_json::to_string(&mapping).unwrap();
        assert!(!json.contains("\"name\""));
        let deserialized: Mapping = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping, deserialized);
    }
}
