//! Shared configuration loader for the docmark toolchain.
//!
//! `defaults/docmark.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DocmarkConfig`],
//! then turn each section into engine options with `From`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use docmark_engine::options::{
    ErrorPolicy, ExportOptions, ExtractOptions, Features, ImageOptions, MathOptions,
    RenderOptions, StyleOptions, TocOptions,
};
use docmark_engine::BatchOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/docmark.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "docmark.toml";

/// Top-level configuration consumed by docmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DocmarkConfig {
    pub render: RenderConfig,
    pub export: ExportConfig,
    pub batch: BatchConfig,
}

/// Markdown → document settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub strict: bool,
    pub ignore_errors: bool,
    pub embed_images: bool,
    pub native_equations: bool,
    pub features: FeaturesConfig,
    pub style: StyleConfig,
    pub toc: TocConfig,
    #[serde(default)]
    pub images: RenderImagesConfig,
}

/// `[render.images]`; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderImagesConfig {
    /// Directory relative image sources are resolved against
    #[serde(default)]
    pub base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesConfig {
    pub gfm: bool,
    pub footnotes: bool,
    pub tables: bool,
    pub task_lists: bool,
    pub math: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    pub font_family: String,
    pub font_size: u32,
    pub code_font: String,
    pub code_color: String,
    pub link_color: String,
    pub math_font: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TocConfig {
    pub enabled: bool,
    pub max_level: u8,
}

/// Document → Markdown settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub gfm: bool,
    pub footnotes: bool,
    pub tables: bool,
    pub task_lists: bool,
    pub setext_headings: bool,
    pub emphasis_marker: char,
    pub bullet_marker: char,
    pub code_language: String,
    pub code_fonts: Vec<String>,
    /// Column limit for paragraph wrapping; 0 disables it
    pub wrap_width: usize,
    pub include_metadata: bool,
    pub preserve_element_order: bool,
    pub ignore_errors: bool,
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    pub extract: bool,
    pub output_dir: PathBuf,
    pub naming_pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub jobs: usize,
    pub ignore_errors: bool,
}

fn error_policy(strict: bool, ignore_errors: bool) -> ErrorPolicy {
    ErrorPolicy {
        strict,
        ignore_errors: ignore_errors && !strict,
        on_error: None,
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        let features = &config.features;
        let style = &config.style;
        RenderOptions {
            features: Features {
                gfm: features.gfm,
                footnotes: features.footnotes,
                tables: features.tables,
                task_lists: features.task_lists,
                math: features.math,
            },
            style: StyleOptions {
                font_family: style.font_family.clone(),
                font_size: style.font_size,
                code_font: style.code_font.clone(),
                code_color: style.code_color.clone(),
                link_color: style.link_color.clone(),
                math_font: style.math_font.clone(),
            },
            toc: TocOptions {
                enabled: config.toc.enabled,
                max_level: config.toc.max_level,
            },
            images: ImageOptions {
                base_path: config.images.base_path.clone(),
                embed: config.embed_images,
            },
            math: MathOptions {
                native_equations: config.native_equations,
            },
            errors: error_policy(config.strict, config.ignore_errors),
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        ExportOptions {
            gfm: config.gfm,
            footnotes: config.footnotes,
            tables: config.tables,
            task_lists: config.task_lists,
            setext_headings: config.setext_headings,
            emphasis_marker: config.emphasis_marker,
            bullet_marker: config.bullet_marker,
            code_language: config.code_language.clone(),
            code_fonts: config.code_fonts.clone(),
            wrap_width: (config.wrap_width > 0).then_some(config.wrap_width),
            include_metadata: config.include_metadata,
            preserve_element_order: config.preserve_element_order,
            images: ExtractOptions {
                extract: config.images.extract,
                output_dir: config.images.output_dir.clone(),
                naming_pattern: config.images.naming_pattern.clone(),
                link_base: None,
            },
            errors: error_policy(false, config.ignore_errors),
        }
    }
}

impl From<&BatchConfig> for BatchOptions {
    fn from(config: &BatchConfig) -> Self {
        BatchOptions {
            parallelism: config.jobs.max(1),
            ignore_errors: config.ignore_errors,
            ..Default::default()
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DocmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DocmarkConfig, ConfigError> {
    Loader::new().build()
}
