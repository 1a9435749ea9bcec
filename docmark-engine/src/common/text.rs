//! Text utilities: bookmark slugs, word wrapping and whitespace splitting.

use std::collections::HashMap;

/// Lowercase alphanumeric words joined by `-`.
///
/// ```text
/// "Getting Started: v2!"  →  "getting-started-v2"
/// ```
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, text: &str) -> String {
        let mut slug = slugify(text);
        if slug.is_empty() {
            slug = "section".to_string();
        }
        let count = self.seen.entry(slug.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            slug
        } else {
            let candidate = format!("{slug}-{}", *count - 1);
            // a literal heading may already own the suffixed name
            if self.seen.contains_key(&candidate) {
                return self.unique(&candidate);
            }
            self.seen.insert(candidate.clone(), 1);
            candidate
        }
    }
}

/// Greedy word wrap at `width` columns. Existing line breaks are kept and
/// words longer than `width` are never split.
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    text.split('\n')
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    let mut out = String::new();
    let mut current = 0usize;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        if current > 0 && current + 1 + len > width {
            out.push('\n');
            current = 0;
        } else if current > 0 {
            out.push(' ');
            current += 1;
        }
        out.push_str(word);
        current += len;
    }
    out
}

/// Split `text` into leading whitespace, core and trailing whitespace.
pub fn split_edges(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    let core_end = core_start + trimmed.len();
    (&text[..core_start], trimmed, &text[core_end..])
}
