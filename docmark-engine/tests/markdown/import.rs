//! Import tests for Markdown format (Markdown → document)
//!
//! These tests verify the document model produced from Markdown text: paragraph
//! styles, run flags, list numbering and the diagnostics reported on the way.

use std::sync::{Arc, Mutex};

use docmark_engine::model::{styles, Alignment, Document, Paragraph};
use docmark_engine::options::{ErrorPolicy, RenderOptions};
use docmark_engine::{markdown_bytes_to_document, markdown_to_document, ErrorKind};
use proptest::prelude::*;

fn md_to_doc(md: &str) -> Document {
    markdown_to_document(md, &RenderOptions::default()).expect("Should render markdown")
}

fn paragraphs(doc: &Document) -> Vec<&Paragraph> {
    doc.paragraphs().collect()
}

#[test]
fn test_heading_and_inline_formatting() {
    let doc = md_to_doc("# Title\n\nHello **bold** and *it*.\n");
    let paras = paragraphs(&doc);
    assert_eq!(paras.len(), 2);
    assert_eq!(paras[0].style(), Some("Heading1"));
    assert_eq!(paras[0].text(), "Title");

    let runs = &paras[1].runs;
    let texts: Vec<&str> = runs.iter().map(|run| run.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello ", "bold", " and ", "it", "."]);
    assert!(runs[1].properties.is_bold());
    assert!(!runs[1].properties.is_italic());
    assert!(runs[3].properties.is_italic());
    assert!(!runs[0].properties.is_bold());
}

#[test]
fn test_document_defaults_come_from_style_options() {
    let doc = md_to_doc("x\n");
    assert_eq!(doc.defaults.font_family.as_deref(), Some("Calibri"));
    assert_eq!(doc.defaults.font_size, Some(22));
}

#[test]
fn test_strikethrough_and_code_span() {
    let doc = md_to_doc("~~gone~~ `code`\n");
    let runs = &paragraphs(&doc)[0].runs;
    assert!(runs[0].properties.is_strike());
    let code = runs.iter().find(|run| run.text == "code").unwrap();
    assert_eq!(code.properties.font_family.as_deref(), Some("Consolas"));
    assert_eq!(code.properties.font_color.as_deref(), Some("C7254E"));
}

#[test]
fn test_link_text_is_colored_not_underlined_markup() {
    let doc = md_to_doc("[**site**](https://example.com)\n");
    let run = &paragraphs(&doc)[0].runs[0];
    assert_eq!(run.text, "site");
    assert!(run.properties.is_bold());
    assert_eq!(run.properties.font_color.as_deref(), Some("0563C1"));
}

#[test]
fn test_lists_carry_numbering_and_glyphs() {
    let doc = md_to_doc("- a\n  - nested\n- [x] done\n\n1. first\n");
    let paras = paragraphs(&doc);
    assert_eq!(paras.len(), 4);
    for para in &paras {
        assert_eq!(para.style(), Some(styles::LIST_PARAGRAPH));
    }
    assert_eq!(paras[0].text(), "• a");
    assert_eq!(paras[1].text(), "  • nested");
    assert_eq!(paras[2].text(), "☑ done");
    assert_eq!(paras[3].text(), "• first");

    let numbering: Vec<(u8, bool)> = paras
        .iter()
        .map(|p| {
            let n = p.properties.numbering.unwrap();
            (n.level, n.ordered)
        })
        .collect();
    assert_eq!(numbering, vec![(0, false), (1, false), (0, false), (0, true)]);

    let indent = paras[1].properties.indentation.unwrap();
    assert_eq!(indent.left, Some(1440));
    assert_eq!(indent.hanging, Some(360));
}

#[test]
fn test_code_block_is_one_paragraph_per_line() {
    let doc = md_to_doc("```\nfn a() {}\n\nfn b() {}\n```\n");
    let paras = paragraphs(&doc);
    let texts: Vec<String> = paras.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["fn a() {}", " ", "fn b() {}"]);
    for para in paras {
        assert_eq!(para.style(), Some(styles::CODE));
        assert_eq!(para.properties.indentation.unwrap().left, Some(360));
        assert_eq!(
            para.runs[0].properties.font_family.as_deref(),
            Some("Consolas")
        );
    }
}

#[test]
fn test_blockquote_and_rule() {
    let doc = md_to_doc("> quoted\n\n---\n\nafter\n");
    let paras = paragraphs(&doc);
    assert_eq!(paras[0].style(), Some(styles::QUOTE));
    assert_eq!(paras[0].text(), "quoted");
    assert!(paras[1].properties.border_bottom);
    assert_eq!(paras[2].text(), "after");
}

#[test]
fn test_math_runs_use_unicode_text() {
    let doc = md_to_doc("Area $\\pi r^2$ here\n\n$$\\frac{1}{2}$$\n");
    let paras = paragraphs(&doc);
    let math = paras[0]
        .runs
        .iter()
        .find(|run| run.text.contains('π'))
        .expect("math run");
    assert!(math.text.contains('²'));
    assert_eq!(math.properties.font_family.as_deref(), Some("Cambria Math"));
    assert_eq!(math.equation, None);

    assert_eq!(paras[1].style(), Some(styles::MATH));
    assert_eq!(paras[1].properties.alignment, Some(Alignment::Center));
    assert_eq!(paras[1].text(), "(1)/(2)");
}

#[test]
fn test_native_equations_attach_markup() {
    let mut options = RenderOptions::default();
    options.math.native_equations = true;
    let doc = markdown_to_document("$$x^2$$\n", &options).unwrap();
    let run = &doc.paragraphs().next().unwrap().runs[0];
    let equation = run.equation.as_deref().unwrap();
    assert!(equation.starts_with("<m:oMath"));
    assert!(equation.contains("<m:sSup>"));
}

#[test]
fn test_images_become_placeholders() {
    let doc = md_to_doc("![a cat](cat.png)\n");
    let run = &paragraphs(&doc)[0].runs[0];
    assert_eq!(run.text, "[Image: a cat]");
    assert_eq!(run.media, None);
    assert!(doc.media.is_empty());

    let mut options = RenderOptions::default();
    options.images.embed = true;
    options.images.base_path = Some("/docs".into());
    let doc = markdown_to_document("![](pics/cat.png)\n", &options).unwrap();
    assert_eq!(doc.media.len(), 1);
    assert!(doc.media[0].source.ends_with("cat.png"));
    assert_eq!(doc.paragraphs().next().unwrap().runs[0].media, Some(0));
}

#[test]
fn test_html_is_reported_with_position() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut options = RenderOptions::default();
    options.errors = ErrorPolicy::lenient().with_callback(move |err| {
        sink.lock().unwrap().push((err.kind, err.line, err.column));
    });

    let doc = markdown_to_document("# T\n\n<div>x</div>\n\nafter\n", &options).unwrap();
    let texts: Vec<String> = doc.paragraphs().map(Paragraph::text).collect();
    assert_eq!(texts, vec!["T", "after"]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(ErrorKind::UnsupportedNode, Some(3), Some(1))]
    );
}

#[test]
fn test_strict_mode_fails_on_html() {
    let options = RenderOptions {
        errors: ErrorPolicy::strict(),
        ..Default::default()
    };
    let err = markdown_to_document("<div>x</div>\n", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedNode);
    assert_eq!(err.line, Some(1));
}

#[test]
fn test_invalid_utf8_is_a_parse_error() {
    let err = markdown_bytes_to_document(b"fine\n\xc3\x28", &RenderOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!((err.line, err.column), (Some(2), Some(1)));
}

#[test]
fn test_toc_bookmarks() {
    let mut options = RenderOptions::default();
    options.toc.enabled = true;
    let doc = markdown_to_document("# Getting Started\n\n## Getting Started\n", &options).unwrap();
    let bookmarks: Vec<Option<String>> = doc
        .paragraphs()
        .map(|p| p.properties.bookmark.clone())
        .collect();
    assert_eq!(
        bookmarks,
        vec![
            Some("_Toc_getting-started".to_string()),
            Some("_Toc_getting-started-1".to_string()),
        ]
    );
}

proptest! {
    #[test]
    fn heading_levels_map_to_heading_styles(level in 1u8..=6, word in "[a-z]{1,12}") {
        let md = format!("{} {word}\n", "#".repeat(level as usize));
        let doc = md_to_doc(&md);
        let para = doc.paragraphs().next().unwrap();
        let expected_style = styles::heading(level);
        prop_assert_eq!(para.style(), Some(expected_style.as_str()));
        prop_assert_eq!(para.text(), word);
    }

    #[test]
    fn emphasis_markers_map_to_run_flags(word in "[a-z]{1,12}", strong in any::<bool>()) {
        let md = if strong { format!("**{word}**\n") } else { format!("*{word}*\n") };
        let doc = md_to_doc(&md);
        let run = &doc.paragraphs().next().unwrap().runs[0];
        prop_assert_eq!(&run.text, &word);
        prop_assert_eq!(run.properties.is_bold(), strong);
        prop_assert_eq!(run.properties.is_italic(), !strong);
    }
}
