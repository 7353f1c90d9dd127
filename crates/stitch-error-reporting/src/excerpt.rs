//! Error excerpts from original sources.
//!
//! An error reported against a position in an assembled document is traced
//! back to the original source and shown with a few lines of surrounding
//! code:
//!
//! ```text
//! Unexpected token at /project/src/app.js :
//!      1 |var a = 1;
//!      2 |var b = ;
//! ----------------^
//!      3 |var c = 3;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use stitch_document::SourceLocator;
use stitch_source_map::split_lines;

use crate::context::SourceContext;
use crate::error::{ReportError, ReportResult};

/// Width of the right-aligned line number column
const LINE_NUMBER_WIDTH: usize = 5;

/// Characters before the code on an excerpt line: a space, the line number
/// column and ` |`
const GUTTER_WIDTH: usize = LINE_NUMBER_WIDTH + 3;

/// Options for building an excerpt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptOptions {
    /// Lines of context shown before and after the error line
    pub lines_around: usize,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        ExcerptOptions { lines_around: 2 }
    }
}

/// One line of original source in an excerpt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptLine {
    /// Line number (1-indexed)
    pub number: usize,
    pub text: String,
}

/// An error message located in its original source, with context lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExcerpt {
    pub message: String,
    /// Original source the error was traced to
    pub source: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
    /// The error line and its neighbours, in order
    pub lines: Vec<ExcerptLine>,
}

impl ErrorExcerpt {
    /// Locate `(line, column)` of `document` and excerpt its original source
    ///
    /// `content` is the rendered document text, including its annotation.
    /// Sources are read through `ctx`, falling back to disk.
    pub fn locate(
        ctx: &SourceContext,
        document: &str,
        content: &str,
        message: &str,
        line: usize,
        column: usize,
    ) -> ReportResult<Self> {
        Self::locate_with(ctx, document, content, message, line, column, ExcerptOptions::default())
    }

    pub fn locate_with(
        ctx: &SourceContext,
        document: &str,
        content: &str,
        message: &str,
        line: usize,
        column: usize,
        options: ExcerptOptions,
    ) -> ReportResult<Self> {
        let found = SourceLocator::new(document, content).locate(line, column);
        tracing::debug!(
            document,
            line,
            column,
            source = %found.source,
            original_line = found.line,
            original_column = found.column,
            "Located error in original source"
        );

        let text = ctx.read(&found.source)?;
        let source_lines = split_lines(&text);
        if found.line == 0 || found.line > source_lines.len() {
            return Err(ReportError::LineOutOfRange {
                path: found.source,
                line: found.line,
                line_count: source_lines.len(),
            });
        }

        let first = found.line.saturating_sub(options.lines_around).max(1);
        let last = (found.line + options.lines_around).min(source_lines.len());
        let lines = (first..=last)
            .map(|number| ExcerptLine {
                number,
                text: source_lines[number - 1].replace('\t', " "),
            })
            .collect();

        Ok(ErrorExcerpt {
            message: message.to_string(),
            source: found.source,
            line: found.line,
            column: found.column,
            lines,
        })
    }

    /// Render as plain text, lines separated by `\n`
    pub fn to_text(&self) -> String {
        let mut result = Vec::with_capacity(self.lines.len() + 2);
        result.push(format!("{} at {} :", self.message, self.source));
        for line in &self.lines {
            result.push(format!(
                " {:>width$} |{}",
                line.number,
                line.text,
                width = LINE_NUMBER_WIDTH
            ));
            if line.number == self.line {
                result.push(format!("{}^", "-".repeat(self.column + GUTTER_WIDTH)));
            }
        }
        result.join("\n")
    }

    /// Render as a JSON value
    ///
    /// ```json
    /// {
    ///   "message": "Unexpected token",
    ///   "source": "/project/src/app.js",
    ///   "line": 2,
    ///   "column": 8,
    ///   "lines": [{"number": 1, "text": "var a = 1;"}]
    /// }
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let lines: Vec<_> = self
            .lines
            .iter()
            .map(|line| json!({ "number": line.number, "text": line.text }))
            .collect();

        json!({
            "message": self.message,
            "source": self.source,
            "line": self.line,
            "column": self.column,
            "lines": lines,
        })
    }
}

impl fmt::Display for ErrorExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Text of an error at `(line, column)` of `document`, shown in its original source
pub fn generate_error_message(
    ctx: &SourceContext,
    document: &str,
    content: &str,
    message: &str,
    line: usize,
    column: usize,
) -> ReportResult<String> {
    Ok(ErrorExcerpt::locate(ctx, document, content, message, line, column)?.to_text())
}
