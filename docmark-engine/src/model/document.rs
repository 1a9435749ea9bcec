//! Document, paragraph and run types.

use serde::{Deserialize, Serialize};

use super::sink::{DocumentSink, ModelError, ModelResult};
use super::table::Table;

/// Root of the document model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Document-wide run defaults (font family/size)
    #[serde(default)]
    pub defaults: RunProperties,
    #[serde(default)]
    pub body: Vec<Element>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<Footnote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaRef>,
}

/// A block-level element of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Paragraph(Paragraph),
    Table(Table),
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|element| match element {
            Element::Paragraph(paragraph) => Some(paragraph),
            Element::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|element| match element {
            Element::Table(table) => Some(table),
            Element::Paragraph(_) => None,
        })
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Element::Paragraph(paragraph));
    }

    /// Append an empty `rows × cols` table and return it for formatting.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> ModelResult<&mut Table> {
        let id = self.create_table(rows, cols)?;
        self.table_mut(id)
    }

    pub fn footnote(&self, id: &str) -> Option<&Footnote> {
        self.footnotes.iter().find(|note| note.id == id)
    }
}

impl DocumentSink for Document {
    fn push_paragraph(&mut self, paragraph: Paragraph) -> ModelResult<()> {
        Document::push_paragraph(self, paragraph);
        Ok(())
    }

    fn create_table(&mut self, rows: usize, cols: usize) -> ModelResult<usize> {
        let table = Table::new(rows, cols)?;
        self.body.push(Element::Table(table));
        Ok(self.body.len() - 1)
    }

    fn table_mut(&mut self, id: usize) -> ModelResult<&mut Table> {
        match self.body.get_mut(id) {
            Some(Element::Table(table)) => Ok(table),
            _ => Err(ModelError::NoSuchTable(id)),
        }
    }

    fn set_metadata(&mut self, key: &str, value: &str) {
        self.metadata.set(key, value);
    }

    fn add_footnote(&mut self, footnote: Footnote) -> ModelResult<()> {
        if self.footnote(&footnote.id).is_some() {
            return Err(ModelError::DuplicateFootnote(footnote.id));
        }
        self.footnotes.push(footnote);
        Ok(())
    }

    fn add_media(&mut self, media: MediaRef) -> usize {
        self.media.push(media);
        self.media.len() - 1
    }

    fn set_defaults(&mut self, defaults: RunProperties) {
        self.defaults = defaults;
    }
}

/// Core document properties (title, author, ...), kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A footnote body referenced from runs by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    pub id: String,
    pub paragraphs: Vec<Paragraph>,
}

/// An image referenced from the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Resolved source path or URL
    pub source: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub properties: ParagraphProperties,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(style: impl Into<String>) -> Self {
        Paragraph {
            properties: ParagraphProperties {
                style: Some(style.into()),
                ..Default::default()
            },
            runs: Vec::new(),
        }
    }

    /// Paragraph holding a single unformatted run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut paragraph = Self::new();
        paragraph.push_run(Run::new(text));
        paragraph
    }

    pub fn style(&self) -> Option<&str> {
        self.properties.style.as_deref()
    }

    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Guarantee at least one (possibly empty) run.
    pub fn ensure_run(&mut self) {
        if self.runs.is_empty() {
            self.runs.push(Run::new(""));
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indentation: Option<Indentation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<Numbering>,
    /// Horizontal rule drawn below the paragraph
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub border_bottom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Paragraph spacing in twentieths of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
}

/// Paragraph indentation in twentieths of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indentation {
    pub left: Option<u32>,
    pub hanging: Option<u32>,
}

/// List numbering attached to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    /// Zero-based nesting level
    pub level: u8,
    pub ordered: bool,
    /// First number of an ordered list, set on its first item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub properties: RunProperties,
    /// Id of the footnote this run references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
    /// Index into [`Document::media`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<usize>,
    /// Office Math markup for formula runs; `text` keeps the Unicode rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_properties(text: impl Into<String>, properties: RunProperties) -> Self {
        Run {
            text: text.into(),
            properties,
            ..Default::default()
        }
    }
}

/// Independent formatting flags of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Hex RGB without the leading `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    /// Size in half-points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl RunProperties {
    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_strike(&self) -> bool {
        self.strike.unwrap_or(false)
    }

    pub fn bold() -> Self {
        RunProperties {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        RunProperties {
            italic: Some(true),
            ..Default::default()
        }
    }
}
