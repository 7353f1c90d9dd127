/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document assembly.

use std::path::PathBuf;

use stitch_source_map::SourceMapError;
use thiserror::Error;

/// Errors raised while configuring a document builder.
///
/// Appending and rendering never fail; only resolving a previous map does.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The previous map path doesn't exist.
    #[error("Previous source map not found: {}", .path.display())]
    PreviousMapNotFound { path: PathBuf },

    /// The previous map path exists but couldn't be read.
    #[error("Failed to read previous source map {}: {source}", .path.display())]
    PreviousMapRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The previous map resolver returned nothing for this document.
    #[error("No previous source map could be resolved for {name}")]
    PreviousMapUnresolved { name: String },

    /// The previous map text couldn't be decoded.
    #[error("Invalid previous source map: {0}")]
    InvalidPreviousMap(#[from] SourceMapError),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
