//! In-memory word-processing document model.
//!
//!     The model mirrors the shape of an office document body: an ordered list of
//!     paragraphs and tables, paragraphs made of runs, tables made of rows and cells
//!     that in turn own paragraphs (and possibly nested tables).
//!
//!     Properties are plain values. Absence of a property (`None`) means "inherit the
//!     default", presence is a request to set it. Copying a row or a cell clones its
//!     properties, so independently mutated copies never alias.
//!
//!     Persistence of the native package format is out of scope. The model derives
//!     serde traits and is written as JSON by [`crate::formats::json`].
//!
//!     Mutations go through [`DocumentSink`] so the renderer can be pointed at any
//!     store that accepts the same narrow set of operations.

mod document;
mod sink;
mod table;

pub use document::{
    Alignment, Document, Element, Footnote, Indentation, MediaRef, Metadata, Numbering,
    Paragraph, ParagraphProperties, Run, RunProperties, Spacing,
};
pub use sink::{DocumentSink, ModelError, ModelResult};
pub use table::{CellProperties, Table, TableCell, TableProperties, TableRow, VMerge};

/// Paragraph style names understood by the renderer and the writer.
pub mod styles {
    pub const NORMAL: &str = "Normal";
    pub const TITLE: &str = "Title";
    pub const QUOTE: &str = "Quote";
    pub const CODE: &str = "Code";
    pub const LIST_PARAGRAPH: &str = "ListParagraph";
    pub const MATH: &str = "Math";

    /// Style name for a heading of the given level (`Heading1`, `Heading2`, ...).
    pub fn heading(level: u8) -> String {
        format!("Heading{level}")
    }

    /// Heading level encoded in a style name, if it is a heading style.
    ///
    /// Accepts `Heading3`, `Heading 3` and `heading3`; `Title` counts as level 1.
    pub fn heading_level(style: &str) -> Option<u8> {
        if style.eq_ignore_ascii_case(TITLE) {
            return Some(1);
        }
        let lower = style.to_ascii_lowercase();
        let rest = lower.strip_prefix("heading")?.trim_start();
        let level: u8 = rest.parse().ok()?;
        (1..=9).contains(&level).then_some(level)
    }
}
