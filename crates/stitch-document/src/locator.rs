/*
 * locator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reverse lookup from a rendered document to its original sources.

use stitch_source_map::{OriginalPosition, PositionMap, decode, paths};

/// Recovers original positions for positions in a rendered document.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    document: String,
    map: Option<PositionMap>,
}

impl SourceLocator {
    /// Create a locator for `content`, decoding its embedded map if present.
    pub fn new(document: impl Into<String>, content: &str) -> Self {
        SourceLocator {
            document: document.into(),
            map: decode(content).map,
        }
    }

    pub fn from_map(document: impl Into<String>, map: Option<PositionMap>) -> Self {
        SourceLocator {
            document: document.into(),
            map,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn map(&self) -> Option<&PositionMap> {
        self.map.as_ref()
    }

    /// Find the original position for `(line, column)` of the document.
    ///
    /// Mappings recorded for plain fragments only pin line starts, so the
    /// column offset from the governing mapping is carried over to the
    /// original column. Sources come back as absolute paths resolved from the
    /// document's directory. Without an applicable mapping the position is
    /// returned as a position in the document itself.
    pub fn locate(&self, line: usize, column: usize) -> OriginalPosition {
        let Some(map) = self.map.as_ref() else {
            return self.fallback(line, column);
        };
        let Some(mut found) = map.original_position_for(line, column) else {
            tracing::trace!(line, column, "No mapping found, locating in document itself");
            return self.fallback(line, column);
        };

        if let Some(generated) = map.generated_position_for(&found.source, found.line, found.column)
            && generated.line == line
            && generated.column != column
        {
            found.column = if column > generated.column {
                found.column + (column - generated.column)
            } else {
                found.column.saturating_sub(generated.column - column)
            };
        }

        found.source = self.absolute_source(&found.source);
        found
    }

    fn fallback(&self, line: usize, column: usize) -> OriginalPosition {
        OriginalPosition::new(self.document.clone(), line, column)
    }

    fn absolute_source(&self, source: &str) -> String {
        let joined = paths::join(paths::dirname(&self.document), source);
        if paths::is_absolute(&joined) {
            return joined;
        }
        match std::env::current_dir() {
            Ok(cwd) => paths::join(&cwd.to_string_lossy(), &joined),
            Err(_) => joined,
        }
    }
}
