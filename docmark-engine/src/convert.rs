//! Conversion façades.
//!
//! String-level entry points wrap the Markdown parser, renderer and writer.
//! [`convert_file`] adds file I/O, format detection and image extraction on
//! top; it is the unit of work the batch driver schedules.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::common::media::{extraction_target, is_remote};
use crate::error::{ConvertError, ConvertResult};
use crate::formats::markdown::{parser, renderer, writer};
use crate::model::Document;
use crate::options::{ExportOptions, ExtractOptions, RenderOptions};
use crate::registry::FormatRegistry;

/// Parse and render Markdown text.
pub fn markdown_to_document(source: &str, options: &RenderOptions) -> ConvertResult<Document> {
    let ast = parser::parse_markdown(source, &options.features);
    renderer::render(&ast, options)
}

/// Like [`markdown_to_document`], but rejects input that is not UTF-8 with a
/// positioned [`ErrorKind::Parse`](crate::error::ErrorKind::Parse) error.
pub fn markdown_bytes_to_document(bytes: &[u8], options: &RenderOptions) -> ConvertResult<Document> {
    let ast = parser::parse_markdown_bytes(bytes, &options.features)?;
    renderer::render(&ast, options)
}

pub fn document_to_markdown(document: &Document, options: &ExportOptions) -> ConvertResult<String> {
    writer::write(document, options)
}

/// Options for [`convert_file`].
///
/// Formats default to detection from the file extensions.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub render: RenderOptions,
    pub export: ExportOptions,
}

/// Convert `input` into `output`, choosing formats by name or extension.
///
/// Relative image paths in Markdown input resolve against the input's
/// directory unless a base path is configured. When exporting Markdown with
/// image extraction on, media files are copied next to the output and linked
/// relative to it.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> ConvertResult<()> {
    let registry = FormatRegistry::default();
    let from = resolve_format(&registry, options.from.as_deref(), input)?;
    let to = resolve_format(&registry, options.to.as_deref(), output)?;
    debug!("converting {} ({from}) -> {} ({to})", input.display(), output.display());

    let document = load(&registry, input, &from, &options.render)?;

    let output_dir = output.parent().filter(|dir| !dir.as_os_str().is_empty());
    let mut export = options.export.clone();
    if to == "markdown" && export.images.extract {
        if export.images.output_dir.is_relative() {
            if let Some(dir) = output_dir {
                export.images.output_dir = dir.join(&export.images.output_dir);
            }
        }
        if export.images.link_base.is_none() {
            export.images.link_base = Some(output_dir.map(Path::to_path_buf).unwrap_or_default());
        }
        extract_images(&document, &export)?;
    }

    let text = registry.serialize(&document, &to, &export)?;
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir).map_err(|err| ConvertError::io("create directory", dir, err))?;
    }
    fs::write(output, text).map_err(|err| ConvertError::io("write", output, err))?;
    Ok(())
}

/// Read `input` into a document, detecting its format unless `from` names one.
pub fn read_document(
    input: &Path,
    from: Option<&str>,
    options: &RenderOptions,
) -> ConvertResult<Document> {
    let registry = FormatRegistry::default();
    let from = resolve_format(&registry, from, input)?;
    load(&registry, input, &from, options)
}

fn load(
    registry: &FormatRegistry,
    input: &Path,
    from: &str,
    options: &RenderOptions,
) -> ConvertResult<Document> {
    let bytes = fs::read(input).map_err(|err| ConvertError::io("read", input, err))?;
    if from == "markdown" {
        let mut render = options.clone();
        if render.images.base_path.is_none() {
            render.images.base_path = input.parent().map(Path::to_path_buf);
        }
        return markdown_bytes_to_document(&bytes, &render);
    }
    let source = String::from_utf8(bytes).map_err(|err| {
        ConvertError::parse(format!("'{}' is not valid UTF-8", input.display())).with_source(err)
    })?;
    registry.parse(&source, from, options)
}

fn resolve_format(
    registry: &FormatRegistry,
    explicit: Option<&str>,
    path: &Path,
) -> ConvertResult<String> {
    match explicit {
        Some(name) => {
            registry.get(name)?;
            Ok(name.to_string())
        }
        None => registry.detect_format_from_filename(path).ok_or_else(|| {
            ConvertError::format(format!(
                "cannot detect a format for '{}'; available: {}",
                path.display(),
                registry.list_formats().join(", ")
            ))
        }),
    }
}

/// Copy every local media source into the extraction directory.
///
/// Returns the files written. Remote sources are skipped; copy failures go
/// through the export error policy.
pub fn extract_images(document: &Document, options: &ExportOptions) -> ConvertResult<Vec<PathBuf>> {
    let ExtractOptions {
        output_dir,
        naming_pattern,
        ..
    } = &options.images;
    let mut written = Vec::new();
    if document.media.is_empty() {
        return Ok(written);
    }
    fs::create_dir_all(output_dir)
        .map_err(|err| ConvertError::io("create directory", output_dir, err))?;

    for (index, media) in document.media.iter().enumerate() {
        if is_remote(&media.source) {
            warn!("not extracting remote image {}", media.source);
            continue;
        }
        let target = extraction_target(output_dir, index + 1, &media.source, naming_pattern);
        match fs::copy(&media.source, &target) {
            Ok(_) => written.push(target),
            Err(err) => {
                let source = Path::new(&media.source);
                options
                    .errors
                    .report(ConvertError::io("copy image", source, err))?;
            }
        }
    }
    debug!("extracted {} image(s)", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn markdown_file_to_json_and_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.md");
        fs::write(&input, "# Title\n\nSome *text*.\n").unwrap();

        let json = dir.path().join("out/doc.json");
        convert_file(&input, &json, &ConvertOptions::default()).unwrap();
        let markdown = dir.path().join("back.md");
        convert_file(&json, &markdown, &ConvertOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(markdown).unwrap(),
            "# Title\n\nSome *text*.\n\n"
        );
    }

    #[test]
    fn missing_input_is_an_io_error_with_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.md");
        let err = convert_file(&missing, &dir.path().join("x.json"), &ConvertOptions::default())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.contains("nope.md"));
    }

    #[test]
    fn unknown_extension_needs_an_explicit_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "plain").unwrap();
        let output = dir.path().join("notes.json");

        let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert!(err.is_kind(ErrorKind::Format));

        let options = ConvertOptions {
            from: Some("markdown".into()),
            ..Default::default()
        };
        convert_file(&input, &output, &options).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn read_document_detects_the_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.markdown");
        fs::write(&input, "# Notes\n").unwrap();
        let doc = read_document(&input, None, &RenderOptions::default()).unwrap();
        assert_eq!(doc.paragraphs().next().unwrap().style(), Some("Heading1"));

        let err = read_document(&input, Some("docx"), &RenderOptions::default()).unwrap_err();
        assert!(err.is_kind(ErrorKind::Format));
    }

    #[test]
    fn images_are_extracted_next_to_the_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cat.png"), b"png").unwrap();
        let input = dir.path().join("in.md");
        fs::write(&input, "![a cat](cat.png)\n").unwrap();
        let json = dir.path().join("doc.json");

        let mut options = ConvertOptions::default();
        options.render.images.embed = true;
        convert_file(&input, &json, &options).unwrap();

        let out_dir = dir.path().join("out");
        let markdown = out_dir.join("doc.md");
        let mut options = ConvertOptions::default();
        options.export.images.extract = true;
        convert_file(&json, &markdown, &options).unwrap();

        assert!(out_dir.join("images/image1.png").exists());
        assert_eq!(
            fs::read_to_string(markdown).unwrap(),
            "![a cat](images/image1.png)\n\n"
        );
    }
}
