//! Error reporting against assembled documents.
//!
//! Errors found in a generated document (by a linter, a parser or a runtime)
//! point at generated positions. This crate traces such a position through
//! the document's embedded map and renders an excerpt of the original
//! source around it.
//!
//! - [`SourceContext`]: registry of original sources, in memory or on disk
//! - [`ErrorExcerpt`]: a located error with its context lines, rendered as
//!   text or JSON
//! - [`generate_error_message`]: locate and render in one call
//!
//! # Example
//!
//! ```
//! use stitch_document::DocumentBuilder;
//! use stitch_error_reporting::{SourceContext, generate_error_message};
//!
//! let source = "var a = 1;\nvar b = ;\nvar c = 3;";
//! let mut doc = DocumentBuilder::new("/project/dist/app.js", true).unwrap();
//! doc.write_content("// generated");
//! doc.write_file_content("../src/app.js", source);
//! let rendered = doc.render();
//!
//! let mut ctx = SourceContext::new();
//! ctx.add_file("/project/src/app.js", Some(source.to_string()));
//!
//! let text = generate_error_message(&ctx, "/project/dist/app.js", &rendered, "Unexpected token", 3, 8).unwrap();
//! assert!(text.starts_with("Unexpected token at /project/src/app.js :"));
//! assert!(text.contains("    2 |var b = ;"));
//! ```

pub mod context;
pub mod error;
pub mod excerpt;

pub use context::{FileId, SourceContext, SourceFile};
pub use error::{ReportError, ReportResult};
pub use excerpt::{ErrorExcerpt, ExcerptLine, ExcerptOptions, generate_error_message};
