//! Options for the render (Markdown → document) and export (document →
//! Markdown) directions, plus the shared error policy.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::error::{ConvertError, ConvertResult};

/// Receives every diagnostic a conversion produces.
pub type ErrorCallback = Arc<dyn Fn(&ConvertError) + Send + Sync>;

/// Receives `(completed, total)` after each batch item.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// How element-level failures are handled.
///
/// The callback sees every reported error. Whether the conversion then
/// continues depends on `ignore_errors`, and `strict` always aborts.
#[derive(Clone)]
pub struct ErrorPolicy {
    pub strict: bool,
    pub ignore_errors: bool,
    pub on_error: Option<ErrorCallback>,
}

impl ErrorPolicy {
    /// Report and continue.
    pub fn lenient() -> Self {
        ErrorPolicy {
            strict: false,
            ignore_errors: true,
            on_error: None,
        }
    }

    /// Report and abort on the first error, including unsupported nodes.
    pub fn strict() -> Self {
        ErrorPolicy {
            strict: true,
            ignore_errors: false,
            on_error: None,
        }
    }

    pub fn with_callback(mut self, callback: impl Fn(&ConvertError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn aborts(&self) -> bool {
        self.strict || !self.ignore_errors
    }

    /// Hand `err` to the callback, then decide whether the caller may go on.
    pub fn report(&self, err: ConvertError) -> ConvertResult<()> {
        self.notify(&err);
        if self.aborts() {
            Err(err)
        } else {
            debug!("continuing after {err}");
            Ok(())
        }
    }

    /// Deliver `err` to the callback without affecting control flow.
    pub fn notify(&self, err: &ConvertError) {
        if let Some(callback) = &self.on_error {
            callback(err);
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::lenient()
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPolicy")
            .field("strict", &self.strict)
            .field("ignore_errors", &self.ignore_errors)
            .field("on_error", &self.on_error.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Markdown extensions recognized on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub gfm: bool,
    pub footnotes: bool,
    pub tables: bool,
    pub task_lists: bool,
    pub math: bool,
}

impl Default for Features {
    fn default() -> Self {
        Features {
            gfm: true,
            footnotes: true,
            tables: true,
            task_lists: true,
            math: true,
        }
    }
}

/// Fonts and accent colors applied by the renderer. Colors are hex RGB
/// without `#`; sizes are in half-points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    pub font_family: String,
    pub font_size: u32,
    pub code_font: String,
    pub code_color: String,
    pub link_color: String,
    pub math_font: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        StyleOptions {
            font_family: "Calibri".to_string(),
            font_size: 22,
            code_font: "Consolas".to_string(),
            code_color: "C7254E".to_string(),
            link_color: "0563C1".to_string(),
            math_font: "Cambria Math".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocOptions {
    pub enabled: bool,
    /// Deepest heading level that receives a bookmark
    pub max_level: u8,
}

impl Default for TocOptions {
    fn default() -> Self {
        TocOptions {
            enabled: false,
            max_level: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    /// Directory relative image paths are resolved against
    pub base_path: Option<PathBuf>,
    /// Record image sources in the document's media list
    pub embed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MathOptions {
    /// Attach Office Math markup to formula runs
    pub native_equations: bool,
}

/// Options for Markdown → document rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub features: Features,
    pub style: StyleOptions,
    pub toc: TocOptions,
    pub images: ImageOptions,
    pub math: MathOptions,
    pub errors: ErrorPolicy,
}

/// Where embedded images go when a document is exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub extract: bool,
    pub output_dir: PathBuf,
    /// File name template; `{n}` is the 1-based image number, `{stem}` and
    /// `{ext}` come from the source file name
    pub naming_pattern: String,
    /// Directory image links are made relative to (normally the directory of
    /// the Markdown output)
    pub link_base: Option<PathBuf>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            extract: false,
            output_dir: PathBuf::from("images"),
            naming_pattern: "image{n}.{ext}".to_string(),
            link_base: None,
        }
    }
}

/// Options for document → Markdown export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// GFM pipe tables; otherwise a simple bold-header layout
    pub gfm: bool,
    pub footnotes: bool,
    pub tables: bool,
    pub task_lists: bool,
    pub setext_headings: bool,
    pub emphasis_marker: char,
    pub bullet_marker: char,
    pub code_language: String,
    /// Font families treated as monospace
    pub code_fonts: Vec<String>,
    pub wrap_width: Option<usize>,
    pub include_metadata: bool,
    /// Emit tables where they appear instead of after all paragraphs
    pub preserve_element_order: bool,
    pub images: ExtractOptions,
    pub errors: ErrorPolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            gfm: true,
            footnotes: true,
            tables: true,
            task_lists: true,
            setext_headings: false,
            emphasis_marker: '*',
            bullet_marker: '-',
            code_language: String::new(),
            code_fonts: ["Consolas", "Courier New", "Menlo", "Monaco", "monospace"]
                .iter()
                .map(|font| font.to_string())
                .collect(),
            wrap_width: None,
            include_metadata: true,
            preserve_element_order: false,
            images: ExtractOptions::default(),
            errors: ErrorPolicy::lenient(),
        }
    }
}

impl ExportOptions {
    pub fn is_code_font(&self, family: &str) -> bool {
        self.code_fonts
            .iter()
            .any(|font| font.eq_ignore_ascii_case(family))
    }
}
