//! JSON persistence of the document model.

use crate::error::{ConvertError, ConvertResult};
use crate::format::Format;
use crate::model::Document;
use crate::options::{ExportOptions, RenderOptions};

/// Serializes the [`Document`] model itself as pretty-printed JSON.
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Document model as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &RenderOptions) -> ConvertResult<Document> {
        serde_json::from_str(source).map_err(|err| {
            ConvertError::parse(format!("invalid document JSON: {err}"))
                .at(err.line(), err.column())
                .with_source(err)
        })
    }

    fn serialize(&self, doc: &Document, _options: &ExportOptions) -> ConvertResult<String> {
        serde_json::to_string_pretty(doc)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|err| {
                ConvertError::format(format!("failed to encode document: {err}")).with_source(err)
            })
    }
}
