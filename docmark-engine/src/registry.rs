//! Format registry for format discovery and selection

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::format::Format;
use crate::model::Document;
use crate::options::{ExportOptions, RenderOptions};

/// Registry of document formats, keyed by name.
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let doc = registry.parse("# Title\n", "markdown", &RenderOptions::default())?;
/// let json = registry.serialize(&doc, "json", &ExportOptions::default())?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format with the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> ConvertResult<&dyn Format> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ConvertError::format(format!("unknown format '{name}'")))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// All format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect a format from a file name's extension.
    pub fn detect_format_from_filename(&self, filename: impl AsRef<Path>) -> Option<String> {
        let extension = filename.as_ref().extension().and_then(|ext| ext.to_str())?;
        let extension = extension.to_ascii_lowercase();

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    pub fn parse(
        &self,
        source: &str,
        format: &str,
        options: &RenderOptions,
    ) -> ConvertResult<Document> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(ConvertError::format(format!(
                "format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source, options)
    }

    pub fn serialize(
        &self,
        doc: &Document,
        format: &str,
        options: &ExportOptions,
    ) -> ConvertResult<String> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(ConvertError::format(format!(
                "format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc, options)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::MarkdownFormat);
        registry.register(crate::formats::JsonFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
