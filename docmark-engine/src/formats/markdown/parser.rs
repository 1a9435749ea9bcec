//! Markdown parsing (text → [`Node`] tree)
//!
//! comrak does the actual CommonMark/GFM parsing; this module adapts its
//! arena AST into the closed [`NodeKind`] tree and attaches source positions.

use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};
use log::debug;

use super::ast::{Node, NodeKind};
use crate::error::{ConvertError, ConvertResult};
use crate::model::Alignment;
use crate::options::Features;

/// Parse Markdown text. Never fails: unknown syntax ends up as
/// [`NodeKind::Unsupported`] nodes.
pub fn parse_markdown(source: &str, features: &Features) -> Node {
    let arena = Arena::new();
    let options = comrak_options(features);
    let root = parse_document(&arena, source, &options);
    let node = convert_node(root);
    debug!("parsed markdown into {} top-level nodes", node.children.len());
    node
}

/// Parse raw bytes, rejecting input that is not UTF-8.
pub fn parse_markdown_bytes(bytes: &[u8], features: &Features) -> ConvertResult<Node> {
    match std::str::from_utf8(bytes) {
        Ok(source) => Ok(parse_markdown(source, features)),
        Err(err) => {
            let valid = &bytes[..err.valid_up_to()];
            let prefix = String::from_utf8_lossy(valid);
            let line = prefix.matches('\n').count() + 1;
            let column = prefix
                .rsplit('\n')
                .next()
                .map(|tail| tail.chars().count() + 1)
                .unwrap_or(1);
            Err(
                ConvertError::parse(format!("input is not valid UTF-8: {err}"))
                    .at(line, column)
                    .with_source(err),
            )
        }
    }
}

fn comrak_options(features: &Features) -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = features.gfm && features.tables;
    options.extension.strikethrough = features.gfm;
    options.extension.autolink = features.gfm;
    options.extension.tasklist = features.gfm && features.task_lists;
    options.extension.footnotes = features.footnotes;
    options.extension.math_dollars = features.math;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

fn convert_node<'a>(node: &'a AstNode<'a>) -> Node {
    let data = node.data.borrow();
    let (line, column) = (data.sourcepos.start.line, data.sourcepos.start.column);

    let kind = match &data.value {
        NodeValue::Document => NodeKind::Document,
        NodeValue::FrontMatter(raw) => NodeKind::FrontMatter(raw.clone()),
        NodeValue::Heading(heading) => NodeKind::Heading(heading.level),
        NodeValue::Paragraph => {
            if let Some(lines) = display_math_only(node) {
                NodeKind::MathBlock(lines)
            } else {
                NodeKind::Paragraph
            }
        }
        NodeValue::List(list) => NodeKind::List {
            ordered: matches!(list.list_type, ListType::Ordered),
            start: list.start,
        },
        NodeValue::Item(_) => NodeKind::ListItem,
        NodeValue::TaskItem(symbol) => {
            let checkbox = Node::new(NodeKind::TaskCheckBox(symbol.is_some())).at(line, column);
            let mut children = vec![checkbox];
            children.extend(node.children().map(convert_node));
            return Node {
                kind: NodeKind::ListItem,
                children,
                line,
                column,
            };
        }
        NodeValue::BlockQuote => NodeKind::Blockquote,
        NodeValue::CodeBlock(code) => {
            let lines = split_lines(&code.literal);
            let info = code.info.trim().to_string();
            if !code.fenced {
                NodeKind::CodeBlock { info, lines }
            } else if info == "math" {
                NodeKind::MathBlock(lines)
            } else {
                NodeKind::FencedCodeBlock { info, lines }
            }
        }
        NodeValue::ThematicBreak => NodeKind::ThematicBreak,
        NodeValue::Text(text) => NodeKind::Text(text.clone()),
        NodeValue::SoftBreak => NodeKind::SoftBreak,
        NodeValue::LineBreak => NodeKind::LineBreak,
        NodeValue::Code(code) => NodeKind::CodeSpan(code.literal.clone()),
        NodeValue::Emph => NodeKind::Emphasis(1),
        NodeValue::Strong => NodeKind::Emphasis(2),
        NodeValue::Strikethrough => NodeKind::Strikethrough,
        NodeValue::Link(link) => NodeKind::Link {
            destination: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Image(link) => NodeKind::Image {
            destination: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Table(table) => NodeKind::Table {
            alignments: table.alignments.iter().map(convert_alignment).collect(),
        },
        NodeValue::TableRow(header) => NodeKind::TableRow { header: *header },
        NodeValue::TableCell => NodeKind::TableCell,
        // display math sharing a paragraph with text stays inline
        NodeValue::Math(math) => NodeKind::InlineMath(math.literal.clone()),
        NodeValue::FootnoteReference(reference) => {
            NodeKind::FootnoteReference(reference.name.clone())
        }
        NodeValue::FootnoteDefinition(definition) => {
            NodeKind::FootnoteDefinition(definition.name.clone())
        }
        NodeValue::HtmlBlock(_) => NodeKind::Unsupported("html block".to_string()),
        NodeValue::HtmlInline(_) => NodeKind::Unsupported("inline html".to_string()),
        NodeValue::DescriptionList => NodeKind::Unsupported("description list".to_string()),
        other => NodeKind::Unsupported(node_name(other)),
    };

    let children = match &kind {
        // already folded into the kind
        NodeKind::MathBlock(_) | NodeKind::CodeBlock { .. } | NodeKind::FencedCodeBlock { .. } => {
            Vec::new()
        }
        _ => node.children().map(convert_node).collect(),
    };

    Node {
        kind,
        children,
        line,
        column,
    }
}

/// Lines of a paragraph consisting of nothing but one `$$...$$` formula.
fn display_math_only<'a>(node: &'a AstNode<'a>) -> Option<Vec<String>> {
    let mut formula = None;
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Math(math) if math.display_math && formula.is_none() => {
                formula = Some(split_lines(math.literal.trim()));
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            NodeValue::Text(text) if text.trim().is_empty() => {}
            _ => return None,
        }
    }
    formula
}

fn convert_alignment(alignment: &TableAlignment) -> Option<Alignment> {
    match alignment {
        TableAlignment::Left => Some(Alignment::Left),
        TableAlignment::Center => Some(Alignment::Center),
        TableAlignment::Right => Some(Alignment::Right),
        TableAlignment::None => None,
    }
}

fn split_lines(literal: &str) -> Vec<String> {
    literal
        .strip_suffix('\n')
        .unwrap_or(literal)
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Short diagnostic name for comrak node kinds without a mapping.
fn node_name(value: &NodeValue) -> String {
    let debug = format!("{value:?}");
    let name = debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("node");
    let mut out = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push(' ');
        }
        out.extend(c.to_lowercase());
    }
    out
}
