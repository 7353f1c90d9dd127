//! Source context for managing original files

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// A unique identifier for a registered source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// Registry of the original sources an excerpt may be taken from
///
/// Files are either ephemeral, with their content held in memory, or
/// disk-backed, in which case the content is read when it is needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file known to the context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// In-memory content; `None` means the content lives on disk at `path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the context and return its ID
    ///
    /// - If content is Some: the file is ephemeral and the content is stored.
    /// - If content is None: the file is disk-backed and read on demand.
    ///
    /// Registering a path twice replaces the earlier entry.
    pub fn add_file(&mut self, path: impl Into<String>, content: Option<String>) -> FileId {
        let path = path.into();
        if let Some(idx) = self.files.iter().position(|file| file.path == path) {
            self.files[idx].content = content;
            return FileId(idx);
        }
        let id = FileId(self.files.len());
        self.files.push(SourceFile { path, content });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn find_file(&self, path: &str) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content of `path`
    ///
    /// Registered in-memory content wins; anything else is read from disk,
    /// whether or not the path was registered.
    pub fn read(&self, path: &str) -> ReportResult<Cow<'_, str>> {
        if let Some(content) = self.find_file(path).and_then(|file| file.content.as_deref()) {
            return Ok(Cow::Borrowed(content));
        }
        tracing::trace!(path, "Reading source from disk");
        std::fs::read_to_string(path)
            .map(Cow::Owned)
            .map_err(|source| ReportError::SourceUnavailable {
                path: path.to_string(),
                source,
            })
    }
}
