//! Error types for conversion operations

use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::model::ModelError;

/// Boxed underlying cause carried by a [`ConvertError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input could not be parsed at all (e.g. invalid UTF-8)
    Parse,
    /// A Markdown construct has no mapping in the document model
    UnsupportedNode,
    /// The document model rejected a mutation (table shape, cell lookup, ...)
    ModelMutation,
    /// File read/write failure in the façade layer
    Io,
    /// Configuration could not be loaded or applied
    Config,
    /// Work was cancelled before it started
    Cancelled,
    /// Format lookup or format capability mismatch
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "parse error",
            ErrorKind::UnsupportedNode => "unsupported node",
            ErrorKind::ModelMutation => "document model error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Config => "configuration error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Format => "format error",
        };
        f.write_str(name)
    }
}

/// A typed conversion error with diagnostic context.
///
/// Renderer-side errors carry the 1-based source line/column of the Markdown
/// node that triggered them.
#[derive(Debug, Error)]
#[error("{kind}: {message}{}", position_suffix(.line, .column))]
pub struct ConvertError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    #[source]
    pub source: Option<BoxedCause>,
}

fn position_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!(" (line {line}, column {column})"),
        (Some(line), None) => format!(" (line {line})"),
        _ => String::new(),
    }
}

impl ConvertError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ConvertError {
            kind,
            message: message.into(),
            line: None,
            column: None,
            source: None,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedNode, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation was cancelled")
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    /// Wrap a document-model failure, keeping it as the source.
    pub fn model(context: impl Into<String>, err: ModelError) -> Self {
        let context = context.into();
        ConvertError {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
            ..Self::new(ErrorKind::ModelMutation, String::new())
        }
    }

    /// Wrap an I/O failure with the operation and path that caused it.
    pub fn io(operation: &str, path: &Path, err: std::io::Error) -> Self {
        ConvertError {
            message: format!("failed to {operation} '{}': {err}", path.display()),
            source: Some(Box::new(err)),
            ..Self::new(ErrorKind::Io, String::new())
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxedCause>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;
