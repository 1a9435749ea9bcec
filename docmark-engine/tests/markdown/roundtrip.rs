//! Markdown → document → Markdown stability

use docmark_engine::model::{Document, RunProperties};
use docmark_engine::options::{ExportOptions, RenderOptions};
use docmark_engine::{document_to_markdown, markdown_to_document, FormatRegistry};
use proptest::prelude::*;

fn md_to_md(md: &str) -> String {
    let doc = markdown_to_document(md, &RenderOptions::default()).expect("render");
    document_to_markdown(&doc, &ExportOptions::default()).expect("export")
}

/// Style and text of every paragraph, with runs of equal formatting merged.
fn outline(doc: &Document) -> Vec<(Option<String>, Vec<(String, RunProperties)>)> {
    doc.paragraphs()
        .map(|paragraph| {
            let mut runs: Vec<(String, RunProperties)> = Vec::new();
            for run in &paragraph.runs {
                match runs.last_mut() {
                    Some((text, properties)) if *properties == run.properties => {
                        text.push_str(&run.text)
                    }
                    _ => runs.push((run.text.clone(), run.properties.clone())),
                }
            }
            (paragraph.style().map(str::to_string), runs)
        })
        .collect()
}

/// Import, export and import again; both imports must agree and the export
/// must be a fixed point.
fn export_stable(md: &str, options: &ExportOptions) -> String {
    let first = markdown_to_document(md, &RenderOptions::default()).expect("render");
    let out = document_to_markdown(&first, options).expect("export");
    let second = markdown_to_document(&out, &RenderOptions::default()).expect("re-render");
    assert_eq!(outline(&second), outline(&first), "re-import of {out:?}");
    assert_eq!(document_to_markdown(&second, options).expect("re-export"), out);
    out
}

fn stable(md: &str) -> String {
    export_stable(md, &ExportOptions::default())
}

#[test]
fn test_mixed_document_reaches_a_fixed_point() {
    let md = "# Notes\n\nIntro with **bold**, *italic* and `code`.\n\n- first\n- [ ] open\n\n> remember\n\n```\nlet x = 1;\n```\n";
    let once = md_to_md(md);
    let twice = md_to_md(&once);
    assert_eq!(once, twice);
    assert_eq!(
        once,
        "# Notes\n\nIntro with **bold**, *italic* and `code`.\n\n- first\n- [ ] open\n\n> remember\n\n```\nlet x = 1;\n```\n\n"
    );
}

#[test]
fn test_literal_emphasis_markers_stay_literal() {
    assert_eq!(stable("\\*not italic\\*\n"), "\\*not italic\\*\n\n");
    assert_eq!(stable("**a \\* b**\n"), "**a \\* b**\n\n");
    assert_eq!(
        stable("\\~\\~kept\\~\\~ and snake\\_case for \\$5\n"),
        "\\~\\~kept\\~\\~ and snake\\_case for \\$5\n\n"
    );
}

#[test]
fn test_literal_block_markers_stay_paragraph_text() {
    assert_eq!(stable("\\# not a heading\n"), "\\# not a heading\n\n");
    assert_eq!(stable("1\\. not a list\n"), "1\\. not a list\n\n");
    assert_eq!(stable("> \\# quoted\n"), "> \\# quoted\n\n");
    assert_eq!(stable("- \\# tag\n"), "- \\# tag\n\n");
}

#[test]
fn test_literal_html_is_not_dropped() {
    let doc = markdown_to_document("&lt;b&gt;kept&lt;/b&gt;\n", &RenderOptions::default()).unwrap();
    assert_eq!(doc.paragraphs().next().unwrap().text(), "<b>kept</b>");
    assert_eq!(stable("&lt;b&gt;kept&lt;/b&gt;\n"), "\\<b>kept\\</b>\n\n");
}

#[test]
fn test_code_spans_with_backticks() {
    assert_eq!(stable("`` a`b ``\n"), "``a`b``\n\n");
    assert_eq!(stable("``` `` ```\n"), "``` `` ```\n\n");
}

#[test]
fn test_wrapped_lines_do_not_start_blocks() {
    let options = ExportOptions {
        wrap_width: Some(8),
        ..Default::default()
    };
    assert_eq!(
        export_stable("aaaaaaa 1. b\n", &options),
        "aaaaaaa\n1\\. b\n\n"
    );
    assert_eq!(
        export_stable("aaaaaaa - b\n", &options),
        "aaaaaaa\n\\- b\n\n"
    );
    assert_eq!(
        export_stable("aaaaaaa ===\n", &options),
        "aaaaaaa\n\\===\n\n"
    );
}

#[test]
fn test_json_round_trip_keeps_the_model() {
    let registry = FormatRegistry::default();
    let md = "# T\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\nText[^n].\n\n[^n]: Note.\n";
    let doc = registry
        .parse(md, "markdown", &RenderOptions::default())
        .unwrap();
    let json = registry
        .serialize(&doc, "json", &ExportOptions::default())
        .unwrap();
    let back = registry
        .parse(&json, "json", &RenderOptions::default())
        .unwrap();
    assert_eq!(back, doc);
    assert_eq!(
        registry
            .serialize(&back, "markdown", &ExportOptions::default())
            .unwrap(),
        md_to_md(md)
    );
}

proptest! {
    #[test]
    fn plain_paragraphs_are_idempotent(
        paragraphs in prop::collection::vec(prop::collection::vec("[a-z]{1,10}", 1..6), 1..5)
    ) {
        let paragraphs: Vec<String> = paragraphs.iter().map(|words| words.join(" ")).collect();
        let md = format!("{}\n", paragraphs.join("\n\n"));
        let expected = format!("{}\n\n", paragraphs.join("\n\n"));

        let once = md_to_md(&md);
        prop_assert_eq!(&once, &expected);
        prop_assert_eq!(md_to_md(&once), expected);
    }
}
