//! Front matter ↔ document metadata

use docmark_engine::model::{Document, Paragraph};
use docmark_engine::options::{ExportOptions, RenderOptions};
use docmark_engine::{document_to_markdown, markdown_to_document};

#[test]
fn test_front_matter_becomes_metadata() {
    let md = "---\ntitle: \"Quarterly Report\"\nauthor: 'Sam'\n# comment\n---\n\nBody\n";
    let doc = markdown_to_document(md, &RenderOptions::default()).unwrap();

    assert_eq!(doc.metadata.get("title"), Some("Quarterly Report"));
    assert_eq!(doc.metadata.get("author"), Some("Sam"));
    assert_eq!(doc.metadata.get("comment"), None);
    let texts: Vec<String> = doc.paragraphs().map(Paragraph::text).collect();
    assert_eq!(texts, vec!["Body"]);
}

#[test]
fn test_metadata_is_written_as_front_matter() {
    let md = "---\ntitle: Hello\n---\n\nBody\n";
    let doc = markdown_to_document(md, &RenderOptions::default()).unwrap();
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "---\ntitle: Hello\n---\n\nBody\n\n");
}

#[test]
fn test_metadata_can_be_left_out() {
    let mut doc = Document::new();
    doc.metadata.set("title", "Hidden");
    doc.push_paragraph(Paragraph::with_text("Body"));
    let options = ExportOptions {
        include_metadata: false,
        ..Default::default()
    };
    assert_eq!(document_to_markdown(&doc, &options).unwrap(), "Body\n\n");
}

#[test]
fn test_documents_without_metadata_have_no_front_matter() {
    let doc = markdown_to_document("Body\n", &RenderOptions::default()).unwrap();
    assert!(doc.metadata.is_empty());
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "Body\n\n");
}
