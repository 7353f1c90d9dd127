//! Position maps for assembled documents
//!
//! This crate tracks where every position of a generated document came from.
//! It records mappings as content is appended, composes maps embedded in
//! fragments that were themselves generated, answers reverse lookups, and
//! reads and writes the trailing `sourceMappingURL` annotation that carries a
//! map inside its content.
//!
//! # Overview
//!
//! The core types are:
//! - [`PositionMap`]: Append-only generated -> original mapping table
//! - [`Mapping`]: One entry, from a [`Position`] to an [`OriginalPosition`]
//! - [`annotation`]: Decoding and encoding of embedded maps
//!
//! # Example
//!
//! ```rust
//! use stitch_source_map::*;
//!
//! let mut map = PositionMap::new("bundle.js");
//! map.record_fragment("a.js", Position::new(1, 0), Position::new(1, 0), 2);
//!
//! let text = encode("alpha\nbeta", Some(&map), CommentStyle::Inline).unwrap();
//! let decoded = decode(&text);
//! assert_eq!(decoded.content, "alpha\nbeta");
//!
//! let found = decoded.map.unwrap().original_position_for(2, 3).unwrap();
//! assert_eq!(found, OriginalPosition::new("a.js", 2, 0));
//! ```

pub mod annotation;
pub mod error;
pub mod paths;
pub mod position_map;
pub mod raw;
pub mod types;
pub mod utils;
pub mod vlq;

// Re-export main types
pub use annotation::{CommentStyle, Decoded, decode, decode_strict, encode, strip_annotation};
pub use error::{SourceMapError, SourceMapResult};
pub use position_map::PositionMap;
pub use raw::RawSourceMap;
pub use types::{Mapping, OriginalPosition, Position};
pub use utils::{column_width, line_count, split_lines};
