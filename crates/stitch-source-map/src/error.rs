//! Error types for position map decoding and encoding.

use thiserror::Error;

/// Errors that can occur while reading or writing position maps
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// `encode` was called without a map to embed
    #[error("No source map supplied to embed in content")]
    MissingMap,

    /// No annotation was found where one was required
    #[error("Content doesn't end with a sourceMappingURL annotation")]
    MissingAnnotation,

    /// The annotation payload isn't valid base64
    #[error("Invalid base64 in source map annotation: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload isn't UTF-8
    #[error("Source map payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The payload isn't a valid source map document
    #[error("Invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only revision 3 maps are understood
    #[error("Unsupported source map version {version}")]
    UnsupportedVersion { version: u32 },

    /// The `mappings` field couldn't be decoded
    #[error("Invalid mappings at segment {segment}: {message}")]
    InvalidMappings { segment: usize, message: String },
}

/// Result type for position map operations.
pub type SourceMapResult<T> = Result<T, SourceMapError>;
