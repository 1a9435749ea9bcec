//! Image source resolution and extraction naming.

use pathdiff::diff_paths;
use std::path::{Path, PathBuf};
use url::Url;

/// Whether `source` names a remote resource (`http:`, `data:`, ...).
///
/// Single-letter schemes are Windows drive letters, not URLs.
pub fn is_remote(source: &str) -> bool {
    match Url::parse(source) {
        Ok(url) => url.scheme().len() > 1 && url.scheme() != "file",
        Err(_) => false,
    }
}

/// Resolve an image destination for display and embedding.
///
/// Remote sources are kept as written, `file:` URLs become paths and
/// relative paths are joined onto `base` when one is configured.
pub fn resolve_source(destination: &str, base: Option<&Path>) -> String {
    if is_remote(destination) {
        return destination.to_string();
    }
    if let Ok(url) = Url::parse(destination) {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return to_forward_slashes(&path);
            }
        }
    }
    let path = Path::new(destination);
    match base {
        Some(base) if path.is_relative() => to_forward_slashes(&base.join(path)),
        _ => destination.to_string(),
    }
}

/// File name for the `number`-th (1-based) extracted image.
///
/// `pattern` may use `{n}`, `{stem}` and `{ext}`. The extension falls back to
/// `png` when the source has none.
pub fn extracted_name(number: usize, source: &str, pattern: &str) -> String {
    let file_name = if is_remote(source) {
        Url::parse(source)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|segments| segments.last().map(str::to_string))
            })
            .unwrap_or_default()
    } else {
        Path::new(source)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let as_path = Path::new(&file_name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("image{number}"));
    let ext = as_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());

    pattern
        .replace("{n}", &number.to_string())
        .replace("{stem}", &stem)
        .replace("{ext}", &ext)
}

/// Where the `number`-th image lands on disk.
pub fn extraction_target(output_dir: &Path, number: usize, source: &str, pattern: &str) -> PathBuf {
    output_dir.join(extracted_name(number, source, pattern))
}

/// Link text for `target` as seen from `link_base`.
pub fn link_path(target: &Path, link_base: Option<&Path>) -> String {
    let candidate = match link_base {
        Some(base) => diff_paths(target, base).unwrap_or_else(|| target.to_path_buf()),
        None => target.to_path_buf(),
    };
    to_forward_slashes(&candidate)
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
