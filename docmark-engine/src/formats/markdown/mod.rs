//! Markdown format implementation
//!
//! Bidirectional conversion between CommonMark/GFM Markdown and the document
//! model.
//!
//! # Pipeline
//!
//! - Import: text → comrak AST → [`ast::Node`] tree ([`parser`]) → document
//!   ([`renderer`])
//! - Export: document → Markdown text ([`writer`])
//!
//! `comrak` handles the grammar, including the GFM, `$`/`$$` math, footnote
//! and front matter extensions. Everything after the adapter works on the
//! closed [`ast::NodeKind`] enum.
//!
//! # Element Mapping Table
//!
//! | Markdown             | Document model                       | Export notes                         |
//! |----------------------|--------------------------------------|--------------------------------------|
//! | `#`…`######`         | `Heading1`…`Heading6` paragraph      | ATX, or Setext for 1–2 when enabled  |
//! | Paragraph            | paragraph of runs                    | emphasis rebuilt from run flags      |
//! | `*x*` / `**x**`      | italic / bold run                    | configurable marker                  |
//! | `~~x~~`              | strike run                           | `~~`                                 |
//! | `` `x` ``            | code-font run with accent color      | backticks for code-font runs         |
//! | Link                 | link-colored run (target dropped)    | plain text                           |
//! | Image                | `[Image: …]` run, optional media     | `![alt](path)` when extracting       |
//! | List item            | `ListParagraph` + numbering          | flattened, `-` or `n.` from start    |
//! | Task item            | `☑ ` / `☐ ` prefix                   | `[x] ` / `[ ] `                      |
//! | Blockquote           | one `Quote` paragraph                | `> ` per line                        |
//! | Code block           | one `Code` paragraph per line        | one fence per block                  |
//! | `---`                | empty paragraph with bottom border   | `---`                                |
//! | Table                | table, bold header row               | GFM pipe table or simple layout      |
//! | `$x$` / `$$x$$`      | math-font run / centered paragraph   | Unicode text                         |
//! | Footnote             | footnote entry + referencing run     | `[^n]` and trailing definitions      |
//! | Front matter         | document metadata                    | `---` block when enabled             |
//!
//! # Lossy Conversions
//!
//! - Heading levels above 6 clamp to 6
//! - List nesting is flattened on export; ordered/unordered and the start
//!   number of top-level ordered lists survive, but adjacent bullet lists
//!   merge
//! - Link destinations are not preserved
//! - Blockquote content collapses to plain text
//! - Raw HTML and other unmapped constructs are reported and skipped
//!
//! Run text is escaped on export so literal punctuation (`*`, `_`, `<`, a
//! leading `#` or `1.`) reads back as the same text rather than as markup.

pub mod ast;
pub mod parser;
pub mod renderer;
pub mod writer;

use crate::error::ConvertResult;
use crate::format::Format;
use crate::model::Document;
use crate::options::{ExportOptions, RenderOptions};

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM, math and footnote extensions"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, options: &RenderOptions) -> ConvertResult<Document> {
        let ast = parser::parse_markdown(source, &options.features);
        renderer::render(&ast, options)
    }

    fn serialize(&self, doc: &Document, options: &ExportOptions) -> ConvertResult<String> {
        writer::write(doc, options)
    }
}
