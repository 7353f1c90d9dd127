//! Trailing `sourceMappingURL` annotations
//!
//! A position map travels with its content as a data URL in a comment on the
//! last non-blank line:
//!
//! ```text
//! //# sourceMappingURL=data:application/json;base64,<payload>
//! /*# sourceMappingURL=data:application/json;base64,<payload>*/
//! ```
//!
//! Whitespace between the comment opener and `#`, and between `#` and the
//! keyword, is tolerated. A candidate annotation followed by any non-blank
//! line is not an annotation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{SourceMapError, SourceMapResult};
use crate::position_map::PositionMap;

/// Data URL prefix written after `# ` in an annotation
pub const SOURCE_MAPPING_URL_PREFIX: &str = "sourceMappingURL=data:application/json;base64,";

/// Inline form; must start its line
static INLINE_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^//[ \t]*#[ \t]*sourceMappingURL=data:application/json(?:;charset=[^;,]+)?;base64,([A-Za-z0-9+/=]*)[ \t]*$",
    )
    .unwrap()
});

/// Block form; only needs to end its line
static BLOCK_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"/\*[ \t]*#[ \t]*sourceMappingURL=data:application/json(?:;charset=[^;,]+)?;base64,([A-Za-z0-9+/=]*)[ \t]*\*/[ \t]*$",
    )
    .unwrap()
});

/// Comment style used to embed a map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `//# sourceMappingURL=...`
    #[default]
    Inline,
    /// `/*# sourceMappingURL=...*/`
    Block,
}

/// Content split from its trailing annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The content without the annotation (unchanged if none was found)
    pub content: String,
    /// The embedded map, if a well-formed annotation was found
    pub map: Option<PositionMap>,
}

/// A located annotation: where the content ends and the payload it carries
struct Candidate<'a> {
    content_end: usize,
    payload: &'a str,
}

fn find_annotation(content: &str) -> Option<Candidate<'_>> {
    // Trailing blank lines don't count as "something after" the annotation
    let trimmed = content.trim_end();
    let line_start = trimmed.rfind(['\n', '\r']).map_or(0, |idx| idx + 1);
    let last_line = &trimmed[line_start..];

    if let Some(captures) = INLINE_ANNOTATION.captures(last_line) {
        return Some(Candidate {
            content_end: line_start,
            payload: captures.get(1).map_or("", |m| m.as_str()),
        });
    }

    let captures = BLOCK_ANNOTATION.captures(last_line)?;
    let whole = captures.get(0)?;
    Some(Candidate {
        content_end: line_start + whole.start(),
        payload: captures.get(1).map_or("", |m| m.as_str()),
    })
}

fn decode_payload(payload: &str) -> SourceMapResult<PositionMap> {
    let bytes = STANDARD.decode(payload)?;
    let json = String::from_utf8(bytes)?;
    PositionMap::from_json(&json)
}

/// Split `content` into text and embedded map
///
/// A malformed payload is treated as "no map": the content is returned
/// unchanged and the problem is logged.
pub fn decode(content: &str) -> Decoded {
    let Some(candidate) = find_annotation(content) else {
        return Decoded {
            content: content.to_string(),
            map: None,
        };
    };

    match decode_payload(candidate.payload) {
        Ok(map) => Decoded {
            content: content[..candidate.content_end].trim_end().to_string(),
            map: Some(map),
        },
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring malformed sourceMappingURL annotation");
            Decoded {
                content: content.to_string(),
                map: None,
            }
        }
    }
}

/// Like [`decode`], but a missing or malformed annotation is an error
pub fn decode_strict(content: &str) -> SourceMapResult<Decoded> {
    let candidate = find_annotation(content).ok_or(SourceMapError::MissingAnnotation)?;
    let map = decode_payload(candidate.payload)?;
    Ok(Decoded {
        content: content[..candidate.content_end].trim_end().to_string(),
        map: Some(map),
    })
}

/// Remove a trailing annotation without decoding the map
pub fn strip_annotation(content: &str) -> &str {
    match find_annotation(content) {
        Some(candidate) => content[..candidate.content_end].trim_end(),
        None => content,
    }
}

/// The annotation line for `map`
pub fn annotation(map: &PositionMap, style: CommentStyle) -> SourceMapResult<String> {
    let payload = STANDARD.encode(map.to_json()?);
    Ok(match style {
        CommentStyle::Inline => format!("//# {}{}", SOURCE_MAPPING_URL_PREFIX, payload),
        CommentStyle::Block => format!("/*# {}{}*/", SOURCE_MAPPING_URL_PREFIX, payload),
    })
}

/// Join content and the annotation for `map`
///
/// Trailing whitespace of `content` is dropped so the annotation is the last
/// line. Fails with [`SourceMapError::MissingMap`] when no map is given.
pub fn encode(content: &str, map: Option<&PositionMap>, style: CommentStyle) -> SourceMapResult<String> {
    let map = map.ok_or(SourceMapError::MissingMap)?;
    Ok(format!("{}\n{}", content.trim_end(), annotation(map, style)?))
}
