//! Markdown tree → document model.
//!
//! The walk is a single pre-order pass over block nodes. Inline nodes are
//! consumed by the block that owns them and never visited on their own, so no
//! text is emitted twice. Formatting flags accumulate down the inline tree:
//! a code span inside a strong link is bold, monospace and link-colored.
//!
//! Failures are element-scoped. A construct with no mapping, or a model
//! mutation that fails, is handed to the [`ErrorPolicy`](crate::options::ErrorPolicy)
//! and the walk moves on unless the policy says to abort.

use std::collections::HashMap;

use log::debug;

use super::ast::{Node, NodeKind};
use crate::common::media::resolve_source;
use crate::common::text::SlugRegistry;
use crate::error::{ConvertError, ConvertResult};
use crate::math;
use crate::model::{
    styles, Alignment, Document, DocumentSink, Footnote, Indentation, MediaRef, ModelError,
    Numbering, Paragraph, Run, RunProperties, Spacing,
};
use crate::options::RenderOptions;

const CODE_INDENT: u32 = 360;
const LIST_INDENT: u32 = 720;
const LIST_HANGING: u32 = 360;
/// Space after the last line of a code block; separates adjacent blocks
const CODE_BLOCK_AFTER: u32 = 120;

/// Render a Markdown tree into a fresh [`Document`].
pub fn render(ast: &Node, options: &RenderOptions) -> ConvertResult<Document> {
    let mut document = Document::new();
    render_into(ast, &mut document, options)?;
    Ok(document)
}

/// Render a Markdown tree into any [`DocumentSink`].
pub fn render_into<S: DocumentSink>(
    ast: &Node,
    sink: &mut S,
    options: &RenderOptions,
) -> ConvertResult<()> {
    let mut renderer = Renderer {
        sink,
        options,
        list_stack: Vec::new(),
        pending_start: None,
        slugs: SlugRegistry::new(),
        footnote_ids: HashMap::new(),
    };
    renderer.sink.set_defaults(RunProperties {
        font_family: Some(options.style.font_family.clone()),
        font_size: Some(options.style.font_size),
        ..Default::default()
    });
    renderer.block(ast)?;
    debug!(
        "rendered markdown with {} footnote(s)",
        renderer.footnote_ids.len()
    );
    Ok(())
}

/// Formatting inherited from enclosing inline nodes.
#[derive(Debug, Clone, Copy, Default)]
struct InlineFormat {
    bold: bool,
    italic: bool,
    strike: bool,
    code: bool,
    link: bool,
}

struct Renderer<'a, S> {
    sink: &'a mut S,
    options: &'a RenderOptions,
    /// `ordered` flag of every open list, innermost last
    list_stack: Vec<bool>,
    /// Start number of an ordered list whose first item is not rendered yet
    pending_start: Option<usize>,
    slugs: SlugRegistry,
    footnote_ids: HashMap<String, String>,
}

impl<S: DocumentSink> Renderer<'_, S> {
    fn block(&mut self, node: &Node) -> ConvertResult<()> {
        match &node.kind {
            NodeKind::Document => self.blocks(&node.children),
            NodeKind::FrontMatter(raw) => {
                for (key, value) in parse_front_matter(raw) {
                    self.sink.set_metadata(&key, &value);
                }
                Ok(())
            }
            NodeKind::Heading(level) => self.heading(node, *level),
            NodeKind::Paragraph => {
                let mut paragraph = Paragraph::new();
                self.inlines(&node.children, InlineFormat::default(), &mut paragraph)?;
                self.push(node, paragraph)
            }
            NodeKind::List { ordered, start } => {
                self.list_stack.push(*ordered);
                self.pending_start = ordered.then_some(*start);
                let result = self.blocks(&node.children);
                self.list_stack.pop();
                result
            }
            NodeKind::ListItem => self.list_item(node),
            NodeKind::Blockquote => {
                let paragraph = Paragraph {
                    runs: vec![Run::new(node.text_content())],
                    ..Paragraph::styled(styles::QUOTE)
                };
                self.push(node, paragraph)
            }
            NodeKind::CodeBlock { lines, .. } | NodeKind::FencedCodeBlock { lines, .. } => {
                self.code_block(node, lines)
            }
            NodeKind::ThematicBreak => {
                let mut paragraph = Paragraph::new();
                paragraph.properties.border_bottom = true;
                paragraph.properties.spacing = Some(Spacing {
                    before: Some(0),
                    after: Some(120),
                });
                self.push(node, paragraph)
            }
            NodeKind::Table { alignments } => self.table(node, alignments),
            NodeKind::TaskCheckBox(checked) => {
                self.push(node, Paragraph::with_text(checkbox_glyph(*checked)))
            }
            NodeKind::MathBlock(lines) => {
                let mut paragraph = Paragraph::styled(styles::MATH);
                paragraph.properties.alignment = Some(Alignment::Center);
                paragraph.push_run(self.math_run(&lines.join("\n")));
                self.push(node, paragraph)
            }
            NodeKind::FootnoteDefinition(label) => self.footnote_definition(node, label),
            _ if node.is_inline() => {
                // stray inline content gets a paragraph of its own
                let mut paragraph = Paragraph::new();
                self.inline(node, InlineFormat::default(), &mut paragraph)?;
                self.push(node, paragraph)
            }
            _ => self.unsupported(node),
        }
    }

    fn blocks(&mut self, nodes: &[Node]) -> ConvertResult<()> {
        for child in nodes {
            self.block(child)?;
        }
        Ok(())
    }

    fn push(&mut self, node: &Node, mut paragraph: Paragraph) -> ConvertResult<()> {
        paragraph.ensure_run();
        match self.sink.push_paragraph(paragraph) {
            Ok(()) => Ok(()),
            Err(err) => self.model_failure(node, "paragraph", err),
        }
    }

    fn heading(&mut self, node: &Node, level: u8) -> ConvertResult<()> {
        let level = level.clamp(1, 6);
        let mut paragraph = Paragraph::styled(styles::heading(level));
        self.inlines(&node.children, InlineFormat::default(), &mut paragraph)?;

        let toc = self.options.toc;
        if toc.enabled && level <= toc.max_level {
            let slug = self.slugs.unique(&node.text_content());
            paragraph.properties.bookmark = Some(format!("_Toc_{slug}"));
        }
        self.push(node, paragraph)
    }

    fn list_item(&mut self, node: &Node) -> ConvertResult<()> {
        let depth = self.list_stack.len().max(1);
        let ordered = self.list_stack.last().copied().unwrap_or(false);

        let mut children = node.children.as_slice();
        let mut glyph = "• ";
        if let Some(Node {
            kind: NodeKind::TaskCheckBox(checked),
            ..
        }) = children.first()
        {
            glyph = checkbox_glyph(*checked);
            children = &children[1..];
        }

        let mut paragraph = Paragraph::styled(styles::LIST_PARAGRAPH);
        paragraph.properties.numbering = Some(Numbering {
            level: (depth - 1).min(u8::MAX as usize) as u8,
            ordered,
            start: if ordered { self.pending_start.take() } else { None },
        });
        paragraph.properties.indentation = Some(Indentation {
            left: Some(LIST_INDENT * depth as u32),
            hanging: Some(LIST_HANGING),
        });
        paragraph.push_run(Run::new(format!("{}{glyph}", "  ".repeat(depth - 1))));

        if let Some(first) = children.first() {
            if first.kind == NodeKind::Paragraph {
                self.inlines(&first.children, InlineFormat::default(), &mut paragraph)?;
                children = &children[1..];
            }
        }
        self.push(node, paragraph)?;
        self.blocks(children)
    }

    fn code_block(&mut self, node: &Node, lines: &[String]) -> ConvertResult<()> {
        let properties = RunProperties {
            font_family: Some(self.options.style.code_font.clone()),
            ..Default::default()
        };
        for (index, line) in lines.iter().enumerate() {
            let text = if line.is_empty() { " " } else { line.as_str() };
            let last = index + 1 == lines.len();
            let mut paragraph = Paragraph::styled(styles::CODE);
            paragraph.properties.indentation = Some(Indentation {
                left: Some(CODE_INDENT),
                hanging: None,
            });
            paragraph.properties.spacing = Some(Spacing {
                before: Some(0),
                after: Some(if last { CODE_BLOCK_AFTER } else { 0 }),
            });
            paragraph.push_run(Run::with_properties(text, properties.clone()));
            self.push(node, paragraph)?;
        }
        Ok(())
    }

    fn table(&mut self, node: &Node, alignments: &[Option<Alignment>]) -> ConvertResult<()> {
        let rows: Vec<&Node> = node
            .children
            .iter()
            .filter(|child| matches!(child.kind, NodeKind::TableRow { .. }))
            .collect();
        let cols = rows
            .iter()
            .map(|row| row.children.len())
            .max()
            .unwrap_or(0)
            .max(alignments.len());

        // (text, emphasis level) per cell; the header row is always bold
        let matrix: Vec<Vec<(String, u8)>> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                row.children
                    .iter()
                    .map(|cell| {
                        let level = if index == 0 {
                            2
                        } else {
                            first_emphasis(cell).unwrap_or(0)
                        };
                        (cell.text_content(), level)
                    })
                    .collect()
            })
            .collect();

        let id = match self.sink.create_table(rows.len(), cols) {
            Ok(id) => id,
            Err(err) => return self.model_failure(node, "table", err),
        };
        if let Err(err) = fill_table(&mut *self.sink, id, &matrix, alignments, cols) {
            return self.model_failure(node, "table", err);
        }
        Ok(())
    }

    fn footnote_definition(&mut self, node: &Node, label: &str) -> ConvertResult<()> {
        let id = self.footnote_id(label);
        let mut paragraphs = Vec::new();
        for child in &node.children {
            let mut paragraph = Paragraph::new();
            if child.kind == NodeKind::Paragraph {
                self.inlines(&child.children, InlineFormat::default(), &mut paragraph)?;
            } else {
                paragraph.push_run(Run::new(child.text_content()));
            }
            paragraph.ensure_run();
            paragraphs.push(paragraph);
        }
        match self.sink.add_footnote(Footnote { id, paragraphs }) {
            Ok(()) => Ok(()),
            Err(err) => self.model_failure(node, "footnote", err),
        }
    }

    fn footnote_id(&mut self, label: &str) -> String {
        let next = self.footnote_ids.len() + 1;
        self.footnote_ids
            .entry(label.to_string())
            .or_insert_with(|| next.to_string())
            .clone()
    }

    fn inlines(
        &mut self,
        nodes: &[Node],
        format: InlineFormat,
        paragraph: &mut Paragraph,
    ) -> ConvertResult<()> {
        for node in nodes {
            self.inline(node, format, paragraph)?;
        }
        Ok(())
    }

    fn inline(
        &mut self,
        node: &Node,
        format: InlineFormat,
        paragraph: &mut Paragraph,
    ) -> ConvertResult<()> {
        match &node.kind {
            NodeKind::Text(text) => {
                paragraph.push_run(Run::with_properties(text.as_str(), self.run_properties(format)))
            }
            NodeKind::SoftBreak => {
                paragraph.push_run(Run::with_properties(" ", self.run_properties(format)))
            }
            NodeKind::LineBreak => {
                paragraph.push_run(Run::with_properties("\n", self.run_properties(format)))
            }
            NodeKind::CodeSpan(code) => {
                let format = InlineFormat {
                    code: true,
                    ..format
                };
                paragraph.push_run(Run::with_properties(code.as_str(), self.run_properties(format)));
            }
            NodeKind::Emphasis(level) => {
                let format = if *level >= 2 {
                    InlineFormat {
                        bold: true,
                        ..format
                    }
                } else {
                    InlineFormat {
                        italic: true,
                        ..format
                    }
                };
                self.inlines(&node.children, format, paragraph)?;
            }
            NodeKind::Strikethrough => {
                let format = InlineFormat {
                    strike: true,
                    ..format
                };
                self.inlines(&node.children, format, paragraph)?;
            }
            NodeKind::Link { .. } => {
                let format = InlineFormat {
                    link: true,
                    ..format
                };
                self.inlines(&node.children, format, paragraph)?;
            }
            NodeKind::Image { destination, .. } => {
                let alt = node.text_content();
                let resolved = resolve_source(destination, self.options.images.base_path.as_deref());
                let label = if alt.is_empty() { &resolved } else { &alt };
                let mut run = Run::with_properties(
                    format!("[Image: {label}]"),
                    self.run_properties(format),
                );
                if self.options.images.embed {
                    run.media = Some(self.sink.add_media(MediaRef {
                        source: resolved.clone(),
                        alt: alt.clone(),
                    }));
                }
                paragraph.push_run(run);
            }
            NodeKind::InlineMath(latex) => paragraph.push_run(self.math_run(latex)),
            NodeKind::FootnoteReference(label) => {
                let mut run = Run::new("");
                run.footnote = Some(self.footnote_id(label));
                paragraph.push_run(run);
            }
            // consumed by the enclosing list item
            NodeKind::TaskCheckBox(_) => {}
            _ => self.unsupported(node)?,
        }
        Ok(())
    }

    fn run_properties(&self, format: InlineFormat) -> RunProperties {
        let style = &self.options.style;
        let mut properties = RunProperties::default();
        if format.bold {
            properties.bold = Some(true);
        }
        if format.italic {
            properties.italic = Some(true);
        }
        if format.strike {
            properties.strike = Some(true);
        }
        if format.link {
            properties.font_color = Some(style.link_color.clone());
        }
        if format.code {
            properties.font_family = Some(style.code_font.clone());
            properties.font_color = Some(style.code_color.clone());
        }
        properties
    }

    fn math_run(&self, latex: &str) -> Run {
        let tree = math::parse(latex);
        let mut run = Run::with_properties(
            math::to_unicode(&tree),
            RunProperties {
                font_family: Some(self.options.style.math_font.clone()),
                ..Default::default()
            },
        );
        if self.options.math.native_equations {
            run.equation = Some(math::to_markup(&tree).to_xml());
        }
        run
    }

    fn unsupported(&self, node: &Node) -> ConvertResult<()> {
        let err = ConvertError::unsupported(describe(&node.kind)).at(node.line, node.column);
        let policy = &self.options.errors;
        if policy.strict {
            policy.report(err)
        } else {
            debug!("skipping {err}");
            policy.notify(&err);
            Ok(())
        }
    }

    fn model_failure(&self, node: &Node, context: &str, err: ModelError) -> ConvertResult<()> {
        self.options
            .errors
            .report(ConvertError::model(context, err).at(node.line, node.column))
    }
}

fn fill_table<S: DocumentSink>(
    sink: &mut S,
    id: usize,
    matrix: &[Vec<(String, u8)>],
    alignments: &[Option<Alignment>],
    cols: usize,
) -> Result<(), ModelError> {
    let table = sink.table_mut(id)?;
    table.set_header_row(0)?;
    for col in 0..cols {
        let alignment = alignments.get(col).copied().flatten().unwrap_or(Alignment::Left);
        table.set_column_alignment(col, alignment)?;
    }
    for (row, cells) in matrix.iter().enumerate() {
        for (col, (text, level)) in cells.iter().enumerate() {
            let properties = match *level {
                2.. => RunProperties::bold(),
                1 => RunProperties::italic(),
                _ => RunProperties::default(),
            };
            table.set_cell_text(row, col, text, properties)?;
        }
    }
    Ok(())
}

/// Level of the first emphasis node in a pre-order walk of `node`.
fn first_emphasis(node: &Node) -> Option<u8> {
    if let NodeKind::Emphasis(level) = node.kind {
        return Some(level);
    }
    node.children.iter().find_map(first_emphasis)
}

fn checkbox_glyph(checked: bool) -> &'static str {
    if checked {
        "☑ "
    } else {
        "☐ "
    }
}

/// `key: value` pairs of a front matter block.
fn parse_front_matter(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "---" && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (key.trim().to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Unsupported(name) => name.clone(),
        NodeKind::TableRow { .. } => "table row outside a table".to_string(),
        NodeKind::TableCell => "table cell outside a table".to_string(),
        other => format!("{other:?} in this position"),
    }
}
