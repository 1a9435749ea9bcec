//! Format trait definition
//!
//! A format converts between its own text representation and the
//! [`Document`] model. Formats may support parsing, serialization, or both.

use crate::error::{ConvertError, ConvertResult};
use crate::model::Document;
use crate::options::{ExportOptions, RenderOptions};

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// struct PlainText;
///
/// impl Format for PlainText {
///     fn name(&self) -> &str {
///         "text"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document, _options: &ExportOptions) -> ConvertResult<String> {
///         Ok(doc.paragraphs().map(|p| p.text() + "\n").collect())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions without the leading dot, used for detection from filenames
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Document
    fn parse(&self, _source: &str, _options: &RenderOptions) -> ConvertResult<Document> {
        Err(ConvertError::format(format!(
            "format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into source text
    fn serialize(&self, _doc: &Document, _options: &ExportOptions) -> ConvertResult<String> {
        Err(ConvertError::format(format!(
            "format '{}' does not support serialization",
            self.name()
        )))
    }
}
