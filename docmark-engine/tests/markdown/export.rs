//! Export tests for Markdown format (document → Markdown)
//!
//! Documents are either built by hand, to pin down how model properties map to
//! Markdown syntax, or rendered from Markdown first.

use docmark_engine::model::{
    styles, Document, Footnote, MediaRef, Numbering, Paragraph, Run, RunProperties,
};
use docmark_engine::options::{ExportOptions, RenderOptions};
use docmark_engine::{document_to_markdown, markdown_to_document};
use insta::assert_snapshot;

fn md_to_md(md: &str) -> String {
    let doc = markdown_to_document(md, &RenderOptions::default()).expect("render");
    document_to_markdown(&doc, &ExportOptions::default()).expect("export")
}

fn doc_of(paragraphs: Vec<Paragraph>) -> Document {
    let mut doc = Document::new();
    for paragraph in paragraphs {
        doc.push_paragraph(paragraph);
    }
    doc
}

fn styled(style: &str, text: &str) -> Paragraph {
    let mut paragraph = Paragraph::styled(style);
    paragraph.push_run(Run::new(text));
    paragraph
}

#[test]
fn test_headings_and_paragraphs() {
    assert_eq!(md_to_md("# T\n"), "# T\n\n");
    assert_eq!(
        md_to_md("## Sub\n\nSome *text* and **bold**.\n"),
        "## Sub\n\nSome *text* and **bold**.\n\n"
    );
}

#[test]
fn test_title_style_is_a_level_one_heading() {
    let doc = doc_of(vec![styled(styles::TITLE, "Report"), styled("Heading 3", "Part")]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "# Report\n\n### Part\n\n");
}

#[test]
fn test_deep_heading_styles_clamp_to_six() {
    let doc = doc_of(vec![
        styled("Heading7", "Seven"),
        styled("Heading 9", "Nine"),
        styled(&styles::heading(6), "Six"),
    ]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "###### Seven\n\n###### Nine\n\n###### Six\n\n");
}

#[test]
fn test_heading_text_is_escaped() {
    let doc = doc_of(vec![styled(&styles::heading(2), "C#"), styled(&styles::heading(1), "- item")]);
    assert_eq!(
        document_to_markdown(&doc, &ExportOptions::default()).unwrap(),
        "## C\\#\n\n# - item\n\n"
    );
    let options = ExportOptions {
        setext_headings: true,
        ..Default::default()
    };
    assert_eq!(
        document_to_markdown(&doc, &options).unwrap(),
        "C#\n---\n\n\\- item\n=======\n\n"
    );
}

#[test]
fn test_setext_headings() {
    let doc = doc_of(vec![
        styled(&styles::heading(1), "Hi"),
        styled(&styles::heading(2), "Longer"),
        styled(&styles::heading(3), "Deep"),
    ]);
    let options = ExportOptions {
        setext_headings: true,
        ..Default::default()
    };
    let out = document_to_markdown(&doc, &options).unwrap();
    assert_eq!(out, "Hi\n===\n\nLonger\n------\n\n### Deep\n\n");
}

#[test]
fn test_lists() {
    assert_eq!(md_to_md("- one\n- two\n"), "- one\n- two\n\n");
    assert_eq!(md_to_md("1. a\n2. b\n"), "1. a\n2. b\n\n");
    assert_eq!(
        md_to_md("- [x] done\n- [ ] todo\n"),
        "- [x] done\n- [ ] todo\n\n"
    );
}

#[test]
fn test_task_glyphs_survive_without_task_lists() {
    let doc = markdown_to_document("- [x] done\n", &RenderOptions::default()).unwrap();
    let options = ExportOptions {
        task_lists: false,
        bullet_marker: '*',
        ..Default::default()
    };
    assert_eq!(document_to_markdown(&doc, &options).unwrap(), "* ☑ done\n\n");
}

#[test]
fn test_numbered_paragraph_without_list_style() {
    let mut paragraph = Paragraph::with_text("step");
    paragraph.properties.numbering = Some(Numbering {
        level: 0,
        ordered: true,
        start: None,
    });
    let doc = doc_of(vec![paragraph, Paragraph::with_text("after")]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "1. step\n\nafter\n\n");
}

#[test]
fn test_code_fence_and_code_span() {
    assert_eq!(md_to_md("```\nfn x() {}\n```\n"), "```\nfn x() {}\n```\n\n");
    assert_eq!(md_to_md("Use `x` now\n"), "Use `x` now\n\n");
}

#[test]
fn test_adjacent_code_blocks_keep_separate_fences() {
    assert_eq!(
        md_to_md("```\na\n```\n\n```\nb\nc\n```\n"),
        "```\na\n```\n\n```\nb\nc\n```\n\n"
    );
}

#[test]
fn test_ordered_list_start_is_kept() {
    assert_eq!(md_to_md("3. c\n4. d\n"), "3. c\n4. d\n\n");
    assert_eq!(md_to_md("- x\n\n7. y\n"), "- x\n\n7. y\n\n");
    assert_eq!(md_to_md("1. a\n\n- b\n\n1. c\n"), "1. a\n- b\n\n1. c\n\n");
    assert_eq!(md_to_md("2. a\n   1. x\n3. b\n"), "2. a\n3. x\n4. b\n\n");
}

#[test]
fn test_code_language_is_applied_to_fences() {
    let doc = markdown_to_document("```python\nprint(1)\n```\n", &RenderOptions::default()).unwrap();
    let options = ExportOptions {
        code_language: "python".into(),
        ..Default::default()
    };
    assert_eq!(
        document_to_markdown(&doc, &options).unwrap(),
        "```python\nprint(1)\n```\n\n"
    );
}

#[test]
fn test_quote_rule_and_math() {
    assert_eq!(
        md_to_md("> hi\n\na\n\n---\n\nb\n"),
        "> hi\n\na\n\n---\n\nb\n\n"
    );
    assert_eq!(md_to_md("$$x^2$$\n"), "x²\n\n");
}

#[test]
fn test_links_keep_only_their_text() {
    assert_eq!(md_to_md("see [site](https://a.example)\n"), "see site\n\n");
}

#[test]
fn test_hard_breaks() {
    let doc = doc_of(vec![Paragraph::with_text("one\ntwo")]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "one  \ntwo\n\n");
}

#[test]
fn test_wrap_width() {
    let doc = doc_of(vec![Paragraph::with_text("aaa bbb ccc ddd")]);
    let options = ExportOptions {
        wrap_width: Some(7),
        ..Default::default()
    };
    assert_eq!(
        document_to_markdown(&doc, &options).unwrap(),
        "aaa bbb\nccc ddd\n\n"
    );
}

#[test]
fn test_empty_paragraphs_are_skipped() {
    let doc = doc_of(vec![
        Paragraph::new(),
        Paragraph::with_text("   "),
        Paragraph::with_text("kept"),
    ]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "kept\n\n");
}

#[test]
fn test_adjacent_runs_with_equal_formatting_merge() {
    let doc = doc_of(vec![Paragraph {
        runs: vec![
            Run::with_properties("bo", RunProperties::bold()),
            Run::with_properties("ld", RunProperties::bold()),
        ],
        ..Paragraph::new()
    }]);
    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_eq!(out, "**bold**\n\n");
}

#[test]
fn test_footnotes() {
    assert_eq!(
        md_to_md("Text[^a].\n\n[^a]: Note.\n"),
        "Text[^1].\n\n---\n\n[^1]: Note.\n"
    );
}

#[test]
fn test_footnotes_are_numbered_by_first_reference() {
    let reference = |id: &str| Run {
        footnote: Some(id.to_string()),
        ..Run::new("")
    };
    let note = |id: &str, text: &str| Footnote {
        id: id.to_string(),
        paragraphs: vec![Paragraph::with_text(text)],
    };
    let mut doc = doc_of(vec![Paragraph {
        runs: vec![Run::new("a"), reference("z"), Run::new(" b"), reference("y")],
        ..Paragraph::new()
    }]);
    doc.footnotes = vec![note("y", "second"), note("z", "first"), note("q", "orphan")];

    let out = document_to_markdown(&doc, &ExportOptions::default()).unwrap();
    assert_snapshot!(out, @r"
    a[^1] b[^2]

    ---

    [^1]: first
    [^2]: second
    [^3]: orphan
    ");

    let options = ExportOptions {
        footnotes: false,
        ..Default::default()
    };
    assert_eq!(document_to_markdown(&doc, &options).unwrap(), "a b\n\n");
}

#[test]
fn test_images_without_extraction_keep_placeholder_text() {
    let mut doc = doc_of(vec![Paragraph {
        runs: vec![Run {
            media: Some(0),
            ..Run::new("[Image: cat]")
        }],
        ..Paragraph::new()
    }]);
    doc.media.push(MediaRef {
        source: "/tmp/cat.jpg".into(),
        alt: "cat".into(),
    });
    assert_eq!(
        document_to_markdown(&doc, &ExportOptions::default()).unwrap(),
        "[Image: cat]\n\n"
    );

    let mut options = ExportOptions::default();
    options.images.extract = true;
    options.images.link_base = Some("".into());
    assert_eq!(
        document_to_markdown(&doc, &options).unwrap(),
        "![cat](images/image1.jpg)\n\n"
    );
}
