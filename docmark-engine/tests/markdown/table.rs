use docmark_engine::model::{Alignment, Document, Paragraph, RunProperties, Table};
use docmark_engine::options::{ErrorPolicy, ExportOptions, RenderOptions};
use docmark_engine::{document_to_markdown, markdown_to_document, ErrorKind};

fn md_to_doc(md: &str) -> Document {
    markdown_to_document(md, &RenderOptions::default()).expect("render")
}

fn first_table(doc: &Document) -> &Table {
    doc.tables().next().expect("a table")
}

#[test]
fn test_table_round_trip() {
    let doc = md_to_doc("| A | B |\n|---|---|\n| 1 | 2 |\n");
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "| A | B |\n|-----|-----|\n| 1 | 2 |\n\n");
}

#[test]
fn test_table_alignment_import_and_export() {
    let doc = md_to_doc("| L | C | R | N |\n|:--|:-:|--:|---|\n| 1 | 2 | 3 | 4 |\n");
    let table = first_table(&doc);
    let alignments: Vec<Option<Alignment>> = (0..4)
        .map(|col| table.cell(1, col).unwrap().alignment())
        .collect();
    assert_eq!(
        alignments,
        vec![
            Some(Alignment::Left),
            Some(Alignment::Center),
            Some(Alignment::Right),
            Some(Alignment::Left),
        ]
    );

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(
        out,
        "| L | C | R | N |\n|-----|:---:|----:|-----|\n| 1 | 2 | 3 | 4 |\n\n"
    );
}

#[test]
fn test_header_row_is_bold_and_body_keeps_emphasis() {
    let doc = md_to_doc("| H | I |\n|---|---|\n| **b** | *i* |\n| plain | `c` |\n");
    let table = first_table(&doc);
    assert!(table.rows[0].header);
    assert!(!table.rows[1].header);

    let props = |row: usize, col: usize| -> RunProperties {
        table.cell(row, col).unwrap().paragraphs[0].runs[0]
            .properties
            .clone()
    };
    assert!(props(0, 0).is_bold());
    assert!(props(1, 0).is_bold());
    assert!(props(1, 1).is_italic() && !props(1, 1).is_bold());
    assert_eq!(props(2, 0), RunProperties::default());
    assert_eq!(table.cell(2, 1).unwrap().text(), "c");
}

#[test]
fn test_tables_follow_paragraphs_unless_order_is_preserved() {
    let doc = md_to_doc("Intro\n\n| A |\n|---|\n| 1 |\n\nOutro\n");

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "Intro\n\nOutro\n\n| A |\n|-----|\n| 1 |\n\n");

    let options = ExportOptions {
        preserve_element_order: true,
        ..Default::default()
    };
    let out = document_to_markdown(&doc, &options).unwrap();
    assert_eq!(out, "Intro\n\n| A |\n|-----|\n| 1 |\n\nOutro\n\n");
}

#[test]
fn test_simple_layout_without_gfm() {
    let doc = md_to_doc("| A | B |\n|---|---|\n| 1 | 2 |\n");
    let options = ExportOptions {
        gfm: false,
        ..Default::default()
    };
    assert_eq!(
        document_to_markdown(&doc, &options).unwrap(),
        "**A** | **B**\n1 | 2\n\n"
    );
}

#[test]
fn test_table_export_can_be_disabled() {
    let doc = md_to_doc("text\n\n| A |\n|---|\n| 1 |\n");
    let options = ExportOptions {
        tables: false,
        ..Default::default()
    };
    assert_eq!(document_to_markdown(&doc, &options).unwrap(), "text\n\n");
}

#[test]
fn test_pipes_are_escaped_and_merged_cells_padded() {
    let mut doc = Document::new();
    doc.push_paragraph(Paragraph::with_text("x"));
    let table = doc.add_table(2, 3).unwrap();
    table.set_cell_text(0, 0, "wide", RunProperties::bold()).unwrap();
    table.set_cell_text(0, 2, "a|b", RunProperties::default()).unwrap();
    table.merge_horizontal(0, 0, 2).unwrap();

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(
        out,
        "x\n\n| wide |  | a\\|b |\n|-----|-----|-----|\n|  |  |  |\n\n"
    );
}

#[test]
fn test_vertical_merge_continuations_are_blank() {
    let mut doc = Document::new();
    let table = doc.add_table(3, 1).unwrap();
    table.set_cell_text(0, 0, "H", RunProperties::default()).unwrap();
    table.set_cell_text(1, 0, "top", RunProperties::default()).unwrap();
    table.set_cell_text(2, 0, "hidden", RunProperties::default()).unwrap();
    table.merge_vertical(0, 1, 2).unwrap();

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "| H |\n|-----|\n| top |\n|  |\n\n");
}

#[test]
fn test_malformed_table_goes_through_the_error_policy() {
    let mut doc = Document::new();
    doc.add_table(1, 1).unwrap();
    if let Some(docmark_engine::model::Element::Table(table)) = doc.body.last_mut() {
        table.rows[0].cells.clear();
    }

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "");

    let options = ExportOptions {
        errors: ErrorPolicy::strict(),
        ..Default::default()
    };
    let err = document_to_markdown(&doc, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ModelMutation);
}
