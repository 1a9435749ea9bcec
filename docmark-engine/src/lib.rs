//! Markdown ↔ word-processing document conversion
//!
//!     This crate converts Markdown text into a structured document model (paragraphs, runs,
//!     tables, footnotes) and writes that model back out as Markdown. A small LaTeX math
//!     transpiler turns formulas into Unicode text and Office Math markup along the way.
//!
//!     This is a pure lib: it powers docmark-cli but never prints, reads environment variables
//!     or configures logging. Diagnostics travel through the error callback in the options; the
//!     `log` facade is only used for debug tracing.
//!
//! Architecture
//!
//!     Markdown text ─[comrak + adapter]→ Node tree ─[renderer]→ Document ─[writer]→ Markdown text
//!
//!     The parser adapter turns comrak's open AST into a closed enum (formats/markdown/ast.rs)
//!     so the renderer matches exhaustively and anything unmapped surfaces as an explicit
//!     `Unsupported` node. The renderer drives the model through the `DocumentSink` trait, which
//!     keeps model invariants (table shape, cell ranges, footnote ids) in one place.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError and ErrorKind
//!     ├── options.rs              # Render/export options and the error policy
//!     ├── model                   # Document model and DocumentSink
//!     ├── math                    # LaTeX parser, Unicode and Office Math renderers
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── ast.rs          # Closed Markdown tree
//!     │   │   ├── parser.rs       # comrak adapter
//!     │   │   ├── renderer.rs     # Node tree → Document
//!     │   │   ├── writer.rs       # Document → Markdown
//!     │   │   └── mod.rs
//!     │   └── json.rs             # Document model persistence
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── convert.rs              # String and file façades
//!     ├── batch.rs                # Sequential / pooled batch driver
//!     └── common                  # Slugs, wrapping, image paths
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown/<area>.rs
//!     ├── math/<area>.rs
//!     └── batch.rs
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs declares them.
//!
//! Error handling
//!
//!     Call-level failures (unreadable files, non-UTF-8 input, unknown formats) are returned.
//!     Element-level failures (an unmapped node, a table the model rejects) go to the
//!     `ErrorPolicy`, which hands them to the callback and decides whether to continue.
//!     Math never fails: unknown input degrades to literal text.

pub mod batch;
pub mod common;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod math;
pub mod model;
pub mod options;
pub mod registry;

pub use batch::{convert_files, run_batch, BatchOptions, BatchReport, CancelToken};
pub use convert::{
    convert_file, document_to_markdown, markdown_bytes_to_document, markdown_to_document,
    read_document, ConvertOptions,
};
pub use error::{ConvertError, ConvertResult, ErrorKind};
pub use format::Format;
pub use math::{latex_to_omml, latex_to_unicode};
pub use model::Document;
pub use options::{ErrorPolicy, ExportOptions, RenderOptions};
pub use registry::FormatRegistry;
