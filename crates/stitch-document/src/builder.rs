/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The position-tracking document builder.

use stitch_source_map::{
    CommentStyle, Decoded, PositionMap, Position, annotation, column_width, decode, line_count,
    split_lines,
};

use crate::error::DocumentResult;
use crate::options::{BuilderOptions, RenderOptions};

/// One unit of appended content.
///
/// Any trailing annotation is stripped from the content on construction and
/// kept as the fragment's embedded map.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Path the content was read from.
    pub source: String,
    /// Content with the annotation removed.
    pub content: String,
    /// Where the content begins in `source`.
    pub anchor: Position,
    /// Map carried by the content, if it was itself generated.
    pub embedded_map: Option<PositionMap>,
}

impl Fragment {
    pub fn new(source: impl Into<String>, content: &str, anchor_line: usize, anchor_column: usize) -> Self {
        let Decoded { content, map } = decode(content);
        Fragment {
            source: source.into(),
            content,
            anchor: Position::new(anchor_line, anchor_column),
            embedded_map: map,
        }
    }
}

/// Builds one output document out of many fragments.
///
/// The document is a list of lines whose last element is the line currently
/// being written; the cursor is always derived from it. When position
/// tracking is on, every fragment append records or composes mappings.
///
/// Append operations return the builder so calls can be chained:
///
/// ```
/// use stitch_document::DocumentBuilder;
///
/// let mut doc = DocumentBuilder::new("1.js", true).unwrap();
/// doc.write_file_content("2.js", "line 1")
///     .write_line("line 2")
///     .write("line 3");
/// assert_eq!(doc.content(), "line 1\nline 2\nline 3");
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    name: String,
    lines: Vec<String>,
    map: Option<PositionMap>,
    base: Option<PositionMap>,
    comment: CommentStyle,
}

impl DocumentBuilder {
    /// Create a builder for the output artifact `name`.
    ///
    /// A previous map in the options is resolved here, once; failing to
    /// resolve it is the only error a builder can report.
    pub fn new(name: impl Into<String>, options: impl Into<BuilderOptions>) -> DocumentResult<Self> {
        let name = name.into();
        let options = options.into();

        let base = match options.prev {
            Some(prev) => Some(prev.resolve(&name)?),
            None => None,
        };
        let map = (options.source_map || base.is_some())
            .then(|| PositionMap::new(name.clone()).with_source_root(options.source_root));

        tracing::debug!(
            name = %name,
            source_map = map.is_some(),
            inherited = base.is_some(),
            "Created document builder"
        );

        Ok(DocumentBuilder {
            name,
            lines: vec![String::new()],
            map,
            base,
            comment: options.comment,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether positions are being tracked.
    pub fn has_source_map(&self) -> bool {
        self.map.is_some()
    }

    /// Append raw text. No mapping is recorded.
    ///
    /// `\r\n`, `\r` and `\n` all end a line.
    pub fn write(&mut self, text: &str) -> &mut Self {
        let mut segments = split_lines(text).into_iter();
        if let (Some(first), Some(current)) = (segments.next(), self.lines.last_mut()) {
            current.push_str(first);
        }
        self.lines.extend(segments.map(str::to_string));
        self
    }

    /// Append text followed by a line terminator.
    pub fn write_line(&mut self, text: &str) -> &mut Self {
        self.write(&format!("{}\n", text))
    }

    /// Append generated text with no attributable source.
    pub fn write_content(&mut self, text: &str) -> &mut Self {
        self.write_line(text)
    }

    /// Append `content` read from `source`, as if it began at
    /// `(anchor_line, anchor_column)` there.
    pub fn write_file_fragment(
        &mut self,
        source: &str,
        content: &str,
        anchor_line: usize,
        anchor_column: usize,
    ) -> &mut Self {
        self.append_fragment(Fragment::new(source, content, anchor_line, anchor_column))
    }

    /// Append a whole file and terminate the current line.
    pub fn write_file_content(&mut self, source: &str, content: &str) -> &mut Self {
        self.write_file_fragment(source, content, 1, 0).write("\n")
    }

    /// Append a fragment, recording or composing its mappings at the cursor.
    pub fn append_fragment(&mut self, fragment: Fragment) -> &mut Self {
        let at = self.cursor();
        if let Some(map) = self.map.as_mut() {
            match &fragment.embedded_map {
                Some(embedded) => map.compose(embedded, &fragment.source, at),
                None => map.record_fragment(
                    &fragment.source,
                    at,
                    fragment.anchor,
                    line_count(&fragment.content),
                ),
            }
        }
        self.write(&fragment.content)
    }

    /// Current end-of-content position.
    pub fn cursor(&self) -> Position {
        let column = self.lines.last().map_or(0, |line| column_width(line));
        Position::new(self.lines.len(), column)
    }

    /// The text written so far, without any annotation.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// The document's map, traced through the previous map if there is one.
    pub fn position_map(&self) -> Option<PositionMap> {
        let mut map = self.map.clone()?;
        if let Some(base) = &self.base {
            let source_file = base.file().unwrap_or(&self.name);
            map.apply(base, source_file);
        }
        Some(map)
    }

    /// Render with the configured annotation style.
    pub fn render(&self) -> String {
        self.render_with(RenderOptions {
            comment: self.comment,
        })
    }

    /// The final text, with the annotation appended when positions are tracked.
    ///
    /// Rendering doesn't change the builder, so repeated calls return the
    /// same text.
    pub fn render_with(&self, options: RenderOptions) -> String {
        let content = self.content();
        let Some(map) = self.position_map() else {
            return content;
        };

        match annotation::encode(&content, Some(&map), options.comment) {
            Ok(text) => {
                tracing::debug!(name = %self.name, mappings = map.len(), "Rendered document");
                text
            }
            Err(err) => {
                tracing::warn!(name = %self.name, error = %err, "Failed to embed position map");
                content
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PreviousMap;
    use stitch_source_map::{Mapping, OriginalPosition};

    fn unmapped() -> DocumentBuilder {
        DocumentBuilder::new("1.js", BuilderOptions::from(false)).unwrap()
    }

    fn mapped() -> DocumentBuilder {
        DocumentBuilder::new("1.js", BuilderOptions::enabled()).unwrap()
    }

    fn readable(doc: &DocumentBuilder) -> String {
        doc.position_map().unwrap().to_string()
    }

    #[test]
    fn test_write_line() {
        for mut doc in [unmapped(), mapped()] {
            doc.write_line("line 1");
            doc.write_line("line 2");
            assert_eq!(doc.content(), "line 1\nline 2\n");
        }
    }

    #[test]
    fn test_write_content() {
        for mut doc in [unmapped(), mapped()] {
            doc.write_content("line 1\nline 2");
            doc.write_content("line 3\nline 4");
            assert_eq!(doc.content(), "line 1\nline 2\nline 3\nline 4\n");
        }
    }

    #[test]
    fn test_write() {
        let mut doc = unmapped();
        doc.write("1");
        doc.write("2");
        doc.write("3\n");
        doc.write("4\n5");
        assert_eq!(doc.content(), "123\n4\n5");
    }

    #[test]
    fn test_write_normalizes_terminators() {
        let mut doc = unmapped();
        doc.write("a\r\nb\rc\n");
        assert_eq!(doc.content(), "a\nb\nc\n");
        assert_eq!(doc.cursor(), Position::new(4, 0));
    }

    #[test]
    fn test_write_line_treats_crlf_as_one_terminator() {
        let mut doc = unmapped();
        doc.write_line("a\r");
        assert_eq!(doc.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_cursor_moves_forward() {
        let mut doc = mapped();
        assert_eq!(doc.cursor(), Position::new(1, 0));
        doc.write("123");
        assert_eq!(doc.cursor(), Position::new(1, 3));
        doc.write("456");
        assert_eq!(doc.cursor(), Position::new(1, 6));
        doc.write("\n");
        assert_eq!(doc.cursor(), Position::new(2, 0));
        doc.write("\n\n");
        assert_eq!(doc.cursor(), Position::new(4, 0));
        doc.write("\n123");
        assert_eq!(doc.cursor(), Position::new(5, 3));
    }

    #[test]
    fn test_cursor_counts_characters() {
        let mut doc = unmapped();
        doc.write("héllo");
        assert_eq!(doc.cursor(), Position::new(1, 5));
    }

    #[test]
    fn test_write_file_content() {
        for mut doc in [unmapped(), mapped()] {
            doc.write_file_content("2.js", "line 1\nline 2");
            doc.write_file_content("2.js", "line 3\nline 4");
            assert_eq!(doc.content(), "line 1\nline 2\nline 3\nline 4\n");
        }
    }

    #[test]
    fn test_write_file_fragment_without_map() {
        let mut doc = unmapped();
        doc.write_file_fragment("2.js", "line 1\nline 2", 1, 0);
        doc.write_file_fragment("2.js", "line 3\nline 4", 2, 0);
        assert_eq!(doc.content(), "line 1\nline 2line 3\nline 4");
        assert!(doc.position_map().is_none());
    }

    #[test]
    fn test_write_file_fragment_records_line_starts() {
        let mut doc = mapped();
        doc.write("_");
        doc.write_file_fragment("2.js", "line 1\nline 2", 1, 0);
        doc.write_file_fragment("3.js", "line 3\nline 4", 2, 3);

        assert_eq!(doc.content(), "_line 1\nline 2line 3\nline 4");
        insta::assert_snapshot!(readable(&doc), @r"
        1, 1 -> 1, 0  2.js
        2, 0 -> 2, 0  2.js
        2, 6 -> 2, 3  3.js
        3, 0 -> 3, 0  3.js
        ");
    }

    #[test]
    fn test_write_file_fragment_strips_annotation_without_map() {
        let mut inner = mapped();
        inner.write_file_content("source.js", "line");
        let rendered = inner.render();

        let mut doc = unmapped();
        doc.write_file_content("middle.js", &rendered);
        assert_eq!(doc.content(), "line\n");
    }

    #[test]
    fn test_chaining() {
        let mut doc = mapped();
        doc.write_file_content("2.js", "line 1")
            .write_line("line 2")
            .write_content("line 3")
            .write("line 4\n")
            .write_file_fragment("2.js", "line 5", 5, 0);

        assert_eq!(doc.content(), "line 1\nline 2\nline 3\nline 4\nline 5");
    }

    #[test]
    fn test_render_without_map_is_plain_content() {
        let mut doc = unmapped();
        doc.write_line("a");
        doc.write_line("b");
        assert_eq!(doc.render(), "a\nb\n");
    }

    #[test]
    fn test_render_produces_correct_map() {
        let mut doc = mapped();
        doc.write_content("// Hello World");
        doc.write_content("// Some unmapped content");
        doc.write_file_content(
            "func1.js",
            "// anonymous function here\nvar f1 = function () {\n    return 1;\n};\n// end of anonymous function\n",
        );
        doc.write_file_content(
            "func2.js",
            "// named function here\n    function f1() {\n        return 1;\n    }\n// end of named function\n",
        );

        let rendered = doc.render();
        let decoded = decode(&rendered);
        assert_eq!(decoded.content, doc.content().trim_end());

        insta::assert_snapshot!(decoded.map.unwrap().to_string(), @r"
        3, 0 -> 1, 0  func1.js
        4, 0 -> 2, 0  func1.js
        5, 0 -> 3, 0  func1.js
        6, 0 -> 4, 0  func1.js
        7, 0 -> 5, 0  func1.js
        8, 0 -> 6, 0  func1.js
        9, 0 -> 1, 0  func2.js
        10, 0 -> 2, 0  func2.js
        11, 0 -> 3, 0  func2.js
        12, 0 -> 4, 0  func2.js
        13, 0 -> 5, 0  func2.js
        14, 0 -> 6, 0  func2.js
        ");
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut doc = mapped();
        doc.write_file_content("a.js", "x\ny");
        assert_eq!(doc.render(), doc.render());
    }

    #[test]
    fn test_render_comment_styles() {
        let mut doc = DocumentBuilder::new("1.js", BuilderOptions::enabled().comment(CommentStyle::Block)).unwrap();
        doc.write_file_content("a.js", "x");
        let rendered = doc.render();
        assert!(rendered.lines().last().unwrap().starts_with("/*# sourceMappingURL="));
        assert!(rendered.ends_with("*/"));

        let inline = doc.render_with(RenderOptions::default());
        assert!(inline.lines().last().unwrap().starts_with("//# sourceMappingURL="));
    }

    #[test]
    fn test_render_elides_trailing_empty_line() {
        let mut doc = mapped();
        doc.write_file_content("a.js", "x");
        let rendered = doc.render();
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "x");
    }

    #[test]
    fn test_source_root_is_serialized_not_applied() {
        let mut doc = DocumentBuilder::new("1.js", BuilderOptions::enabled().source_root("http://example.com/app/js/"))
            .unwrap();
        doc.write_file_content("../other/path/source.js", "line");

        let map = doc.position_map().unwrap();
        assert_eq!(map.mappings()[0].original.as_ref().unwrap().source, "../other/path/source.js");
        assert_eq!(
            map.original_position_for(1, 0).unwrap().source,
            "http://example.com/app/other/path/source.js"
        );
        assert_eq!(map.to_raw().source_root.as_deref(), Some("http://example.com/app/js/"));
    }

    #[test]
    fn test_previous_map_is_traced_through() {
        let mut prev = PositionMap::new("app.js");
        prev.add_mapping(Mapping::new(Position::new(1, 0), OriginalPosition::new("src/app.ts", 10, 0)));
        prev.add_mapping(Mapping::new(Position::new(2, 0), OriginalPosition::new("src/app.ts", 12, 2)));

        let mut doc = DocumentBuilder::new("app.min.js", BuilderOptions::new().prev(PreviousMap::Decoded(prev))).unwrap();
        assert!(doc.has_source_map());
        doc.write_file_content("app.js", "a();\nb();");

        insta::assert_snapshot!(readable(&doc), @r"
        1, 0 -> 10, 0  src/app.ts
        2, 0 -> 12, 2  src/app.ts
        ");
    }

    #[test]
    fn test_invalid_previous_map_fails_construction() {
        let result = DocumentBuilder::new("1.js", BuilderOptions::new().prev(PreviousMap::Inline("nope".into())));
        assert!(result.is_err());
    }
}
