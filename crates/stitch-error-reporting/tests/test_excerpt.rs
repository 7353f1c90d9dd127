/*
 * test_excerpt.rs
 *
 * Excerpts for errors reported against rendered documents.
 */

use stitch_document::{BuilderOptions, DocumentBuilder};
use stitch_error_reporting::{ErrorExcerpt, ReportError, SourceContext, generate_error_message};

const STYLES: &str = ".a {\n\tcolor: red;\n}\n.b {\n    margin: 0\n}\n.c {}";

fn bundle() -> String {
    let mut doc = DocumentBuilder::new("/project/dist/bundle.css", BuilderOptions::enabled()).unwrap();
    doc.write_content("/* bundle */");
    doc.write_file_content("../styles/site.css", STYLES);
    doc.render()
}

#[test]
fn test_error_message_from_registered_source() {
    let mut ctx = SourceContext::new();
    ctx.add_file("/project/styles/site.css", Some(STYLES.to_string()));

    let text = generate_error_message(&ctx, "/project/dist/bundle.css", &bundle(), "Missing semicolon", 6, 13)
        .unwrap();
    insta::assert_snapshot!(text, @r"
    Missing semicolon at /project/styles/site.css :
         3 |}
         4 |.b {
         5 |    margin: 0
    ---------------------^
         6 |}
         7 |.c {}
    ");
}

#[test]
fn test_error_message_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let styles = dir.path().join("styles");
    std::fs::create_dir(&styles).unwrap();
    std::fs::write(styles.join("site.css"), STYLES).unwrap();

    let document = dir.path().join("dist").join("bundle.css");
    let document = document.to_string_lossy().to_string();
    let mut doc = DocumentBuilder::new(document.clone(), true).unwrap();
    doc.write_content("/* bundle */");
    doc.write_file_content("../styles/site.css", STYLES);

    let excerpt = ErrorExcerpt::locate(&SourceContext::new(), &document, &doc.render(), "Bad color", 3, 1).unwrap();
    assert!(excerpt.source.ends_with("/styles/site.css"), "{}", excerpt.source);
    assert_eq!((excerpt.line, excerpt.column), (2, 1));
    assert_eq!(excerpt.lines.iter().map(|line| line.number).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(excerpt.lines[1].text, " color: red;");
}

#[test]
fn test_missing_source_is_reported() {
    let err = ErrorExcerpt::locate(&SourceContext::new(), "/project/dist/bundle.css", &bundle(), "Oops", 2, 0)
        .unwrap_err();
    match err {
        ReportError::SourceUnavailable { path, .. } => assert_eq!(path, "/project/styles/site.css"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unmapped_line_reports_against_document() {
    let rendered = bundle();
    let mut ctx = SourceContext::new();
    ctx.add_file("/project/dist/bundle.css", Some(rendered.clone()));

    let excerpt = ErrorExcerpt::locate(&ctx, "/project/dist/bundle.css", &rendered, "Header", 1, 3).unwrap();
    assert_eq!(excerpt.source, "/project/dist/bundle.css");
    assert_eq!(excerpt.lines[0].text, "/* bundle */");
    assert_eq!(excerpt.to_json()["column"], 3);
}
