/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builder configuration.
//!
//! Options can be built in code or deserialized. The serialized form accepts
//! either a bare boolean (shorthand for enabling or disabling the position
//! map) or an object:
//!
//! ```json
//! { "sourceMap": { "prev": "dist/app.js.map" }, "comment": "block", "sourceRoot": "/src/" }
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use stitch_source_map::{CommentStyle, PositionMap, SourceMapError, decode_strict};

use crate::error::{DocumentError, DocumentResult};

/// Callback resolving the previous map text for an output name.
pub type PreviousMapResolver = Box<dyn Fn(&str) -> Option<String>>;

/// Where the map of an already-mapped input comes from.
///
/// Map text may be a source map JSON document or content that ends in a
/// `sourceMappingURL` annotation.
pub enum PreviousMap {
    /// Map text given directly.
    Inline(String),
    /// A file holding map text.
    Path(PathBuf),
    /// A callback from the output name to map text.
    Resolver(PreviousMapResolver),
    /// An already decoded map.
    Decoded(PositionMap),
}

impl PreviousMap {
    pub fn resolver(resolve: impl Fn(&str) -> Option<String> + 'static) -> Self {
        PreviousMap::Resolver(Box::new(resolve))
    }

    /// Load and decode the map for the document `name`.
    pub fn resolve(self, name: &str) -> DocumentResult<PositionMap> {
        match self {
            PreviousMap::Inline(text) => parse_map_text(&text),
            PreviousMap::Path(path) => {
                tracing::debug!(path = %path.display(), "Reading previous source map");
                let text = match std::fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                        return Err(DocumentError::PreviousMapNotFound { path });
                    }
                    Err(source) => return Err(DocumentError::PreviousMapRead { path, source }),
                };
                parse_map_text(&text)
            }
            PreviousMap::Resolver(resolve) => match resolve(name) {
                Some(text) => parse_map_text(&text),
                None => Err(DocumentError::PreviousMapUnresolved {
                    name: name.to_string(),
                }),
            },
            PreviousMap::Decoded(map) => Ok(map),
        }
    }
}

fn parse_map_text(text: &str) -> DocumentResult<PositionMap> {
    if text.trim_start().starts_with('{') {
        return Ok(PositionMap::from_json(text)?);
    }
    decode_strict(text)?
        .map
        .ok_or(DocumentError::InvalidPreviousMap(SourceMapError::MissingAnnotation))
}

impl fmt::Debug for PreviousMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviousMap::Inline(text) => f.debug_tuple("Inline").field(&text.len()).finish(),
            PreviousMap::Path(path) => f.debug_tuple("Path").field(path).finish(),
            PreviousMap::Resolver(_) => f.write_str("Resolver(..)"),
            PreviousMap::Decoded(map) => f.debug_tuple("Decoded").field(map).finish(),
        }
    }
}

/// Configuration recognized when a builder is constructed.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "OptionsRepr")]
pub struct BuilderOptions {
    /// Track positions and embed the map when rendering.
    pub source_map: bool,
    /// Annotation style used by `render`.
    pub comment: CommentStyle,
    /// Prefix for original sources, written as the map's `sourceRoot`.
    pub source_root: Option<String>,
    /// Map of the input being re-processed, traced through on output.
    pub prev: Option<PreviousMap>,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with position tracking turned on.
    pub fn enabled() -> Self {
        BuilderOptions {
            source_map: true,
            ..Self::default()
        }
    }

    pub fn comment(mut self, comment: CommentStyle) -> Self {
        self.comment = comment;
        self
    }

    pub fn source_root(mut self, source_root: impl Into<String>) -> Self {
        self.source_root = Some(source_root.into());
        self
    }

    /// Set the previous map. This also turns position tracking on.
    pub fn prev(mut self, prev: PreviousMap) -> Self {
        self.source_map = true;
        self.prev = Some(prev);
        self
    }
}

impl From<bool> for BuilderOptions {
    fn from(source_map: bool) -> Self {
        BuilderOptions {
            source_map,
            ..Self::default()
        }
    }
}

/// Options for a single `render` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub comment: CommentStyle,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionsRepr {
    Flag(bool),
    Object(ObjectOptions),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectOptions {
    #[serde(default)]
    source_map: Option<SourceMapRepr>,
    #[serde(default)]
    comment: CommentStyle,
    #[serde(default)]
    source_root: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceMapRepr {
    Enabled(bool),
    Settings { prev: Option<PathBuf> },
}

impl From<OptionsRepr> for BuilderOptions {
    fn from(repr: OptionsRepr) -> Self {
        match repr {
            OptionsRepr::Flag(source_map) => BuilderOptions::from(source_map),
            OptionsRepr::Object(object) => {
                let (source_map, prev) = match object.source_map {
                    None => (false, None),
                    Some(SourceMapRepr::Enabled(enabled)) => (enabled, None),
                    Some(SourceMapRepr::Settings { prev }) => (true, prev.map(PreviousMap::Path)),
                };
                BuilderOptions {
                    source_map,
                    comment: object.comment,
                    source_root: object.source_root,
                    prev,
                }
            }
        }
    }
}
