//! Errors raised while building excerpts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The original source couldn't be read.
    #[error("Source {path} is not available: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The located line doesn't exist in the original source.
    #[error("Line {line} is outside of {path} ({line_count} lines)")]
    LineOutOfRange {
        path: String,
        line: usize,
        line_count: usize,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;
