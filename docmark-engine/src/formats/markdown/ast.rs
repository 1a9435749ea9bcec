//! Closed Markdown syntax tree consumed by the renderer.
//!
//! The parser adapter produces this from comrak's arena AST so the renderer
//! can match exhaustively. Constructs with no document mapping are kept as
//! [`NodeKind::Unsupported`] instead of being dropped, so diagnostics can
//! point at them.

use crate::model::Alignment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// 1-based source line (0 when built by hand)
    pub line: usize,
    /// 1-based source column (0 when built by hand)
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    /// Raw front matter block, delimiters included
    FrontMatter(String),
    Heading(u8),
    Paragraph,
    List {
        ordered: bool,
        start: usize,
    },
    ListItem,
    Blockquote,
    /// Indented code block
    CodeBlock {
        info: String,
        lines: Vec<String>,
    },
    FencedCodeBlock {
        info: String,
        lines: Vec<String>,
    },
    ThematicBreak,
    Text(String),
    SoftBreak,
    LineBreak,
    CodeSpan(String),
    /// 1 = emphasis (italic), 2 = strong (bold)
    Emphasis(u8),
    Strikethrough,
    Link {
        destination: String,
        title: String,
    },
    Image {
        destination: String,
        title: String,
    },
    /// Per-column alignment; `None` means unspecified
    Table {
        alignments: Vec<Option<Alignment>>,
    },
    TableRow {
        header: bool,
    },
    TableCell,
    TaskCheckBox(bool),
    /// Display formula, one entry per source line
    MathBlock(Vec<String>),
    InlineMath(String),
    FootnoteReference(String),
    FootnoteDefinition(String),
    /// Anything else, named for diagnostics
    Unsupported(String),
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
            line: 0,
            column: 0,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Node {
            children,
            ..Node::new(kind)
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::new(NodeKind::Text(text.into()))
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Text(_)
                | NodeKind::SoftBreak
                | NodeKind::LineBreak
                | NodeKind::CodeSpan(_)
                | NodeKind::Emphasis(_)
                | NodeKind::Strikethrough
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::InlineMath(_)
                | NodeKind::FootnoteReference(_)
        )
    }

    /// Plain text of the subtree.
    ///
    /// Breaks become spaces inside a block; sibling blocks are joined with
    /// `\n`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::CodeSpan(text) | NodeKind::InlineMath(text) => {
                out.push_str(text)
            }
            NodeKind::SoftBreak | NodeKind::LineBreak => out.push(' '),
            NodeKind::CodeBlock { lines, .. } | NodeKind::FencedCodeBlock { lines, .. } => {
                out.push_str(&lines.join("\n"))
            }
            NodeKind::MathBlock(lines) => out.push_str(&lines.join("\n")),
            NodeKind::TaskCheckBox(_) | NodeKind::FootnoteReference(_) => {}
            _ => {
                let mut first_block = true;
                for child in &self.children {
                    if !child.is_inline() {
                        if !first_block {
                            out.push('\n');
                        }
                        first_block = false;
                    }
                    child.collect_text(out);
                }
            }
        }
    }
}
