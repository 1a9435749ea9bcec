//! The narrow mutation interface the renderer drives.

use thiserror::Error;

use super::document::{Footnote, MediaRef, Paragraph, RunProperties};
use super::table::Table;

/// Failures raised by the document model's own invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("a table needs at least one row and one column (got {rows}x{cols})")]
    InvalidTableShape { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is outside a {rows}x{cols} table")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("column {col} is outside a table with {cols} columns")]
    ColumnOutOfRange { col: usize, cols: usize },

    #[error("cannot merge {span} cells starting at column {col} in a row of {cols}")]
    InvalidSpan { col: usize, span: usize, cols: usize },

    #[error("element {0} is not a table")]
    NoSuchTable(usize),

    #[error("footnote '{0}' is already defined")]
    DuplicateFootnote(String),

    #[error("{0}")]
    Rejected(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Mutation operations a document store must accept to be rendered into.
///
/// [`crate::model::Document`] is the in-memory implementation. Tables are
/// addressed by the id returned from [`DocumentSink::create_table`].
pub trait DocumentSink {
    fn push_paragraph(&mut self, paragraph: Paragraph) -> ModelResult<()>;

    fn create_table(&mut self, rows: usize, cols: usize) -> ModelResult<usize>;

    fn table_mut(&mut self, id: usize) -> ModelResult<&mut Table>;

    fn set_metadata(&mut self, key: &str, value: &str);

    fn add_footnote(&mut self, footnote: Footnote) -> ModelResult<()>;

    /// Register an image and return its index.
    fn add_media(&mut self, media: MediaRef) -> usize;

    fn set_defaults(&mut self, defaults: RunProperties);
}
