/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Assembling one document out of many fragments.
//!
//! A [`DocumentBuilder`] collects plain text and whole or partial files,
//! keeping a position map that points every generated line back to where it
//! came from. Fragments that were themselves produced by a builder carry
//! their own map in a trailing annotation; it is composed into the outer map
//! so lookups reach the deepest original source.
//!
//! A [`SourceLocator`] reads the annotation back out of rendered text and
//! answers "where did this line and column come from?".
//!
//! ```
//! use stitch_document::{BuilderOptions, DocumentBuilder, SourceLocator};
//!
//! let mut inner = DocumentBuilder::new("lib/middle.js", BuilderOptions::enabled()).unwrap();
//! inner.write_file_content("../src/util.js", "export const x = 1;");
//!
//! let mut outer = DocumentBuilder::new("/dist/bundle.js", true).unwrap();
//! outer.write_content("// bundle");
//! outer.write_file_content("lib/middle.js", &inner.render());
//!
//! let locator = SourceLocator::new("/dist/bundle.js", &outer.render());
//! let found = locator.locate(2, 7);
//! assert_eq!(found.source, "/dist/src/util.js");
//! assert_eq!((found.line, found.column), (1, 7));
//! ```

pub mod builder;
pub mod error;
pub mod locator;
pub mod options;

pub use builder::{DocumentBuilder, Fragment};
pub use error::{DocumentError, DocumentResult};
pub use locator::SourceLocator;
pub use options::{BuilderOptions, PreviousMap, PreviousMapResolver, RenderOptions};
