//! Document model → Markdown text.
//!
//! Output layout, top to bottom:
//!
//! | section      | emitted when                                          |
//! |--------------|-------------------------------------------------------|
//! | front matter | `include_metadata` and the document has metadata       |
//! | paragraphs   | always (empty paragraphs are skipped)                  |
//! | tables       | after the paragraphs, or in place with `preserve_element_order` |
//! | footnotes    | at least one footnote and `footnotes` enabled          |
//!
//! Paragraph styles drive the block syntax (headings, quotes, code fences,
//! list lines, rules). Run flags drive the inline markers.
//!
//! Literal text is escaped so that it reads back as the same text: inline
//! punctuation with [`escape_inline`], and block markers at the start of
//! every output line (including lines created by wrapping) with
//! [`escape_block_starts`].

use std::collections::HashMap;

use log::debug;

use crate::common::media::{extraction_target, link_path};
use crate::common::text::{split_edges, wrap};
use crate::error::{ConvertError, ConvertResult};
use crate::model::{styles, Alignment, Document, Element, ModelError, Paragraph, Run, Table};
use crate::options::ExportOptions;

const HARD_BREAK: &str = "  \n";

/// Serialize `document` as Markdown.
pub fn write(document: &Document, options: &ExportOptions) -> ConvertResult<String> {
    let mut writer = Writer {
        document,
        options,
        out: String::new(),
        code_lines: Vec::new(),
        in_list: false,
        ordered_counter: 0,
        footnote_order: Vec::new(),
        footnote_numbers: HashMap::new(),
    };

    writer.front_matter();
    if options.preserve_element_order {
        for element in &document.body {
            match element {
                Element::Paragraph(paragraph) => writer.paragraph(paragraph),
                Element::Table(table) => writer.table(table)?,
            }
        }
    } else {
        for paragraph in document.paragraphs() {
            writer.paragraph(paragraph);
        }
        for table in document.tables() {
            writer.table(table)?;
        }
    }
    writer.end_group();
    writer.footnotes();
    Ok(writer.out)
}

struct Writer<'a> {
    document: &'a Document,
    options: &'a ExportOptions,
    out: String,
    /// Pending lines of a code fence
    code_lines: Vec<String>,
    in_list: bool,
    ordered_counter: usize,
    footnote_order: Vec<String>,
    footnote_numbers: HashMap<String, usize>,
}

impl Writer<'_> {
    fn front_matter(&mut self) {
        let metadata = &self.document.metadata;
        if !self.options.include_metadata || metadata.is_empty() {
            return;
        }
        self.out.push_str("---\n");
        for (key, value) in metadata.iter() {
            self.out.push_str(&format!("{key}: {value}\n"));
        }
        self.out.push_str("---\n\n");
    }

    /// Close an open code fence or list before a different kind of block.
    fn end_group(&mut self) {
        if !self.code_lines.is_empty() {
            let lines = std::mem::take(&mut self.code_lines);
            self.out.push_str("```");
            self.out.push_str(&self.options.code_language);
            self.out.push('\n');
            for line in lines {
                self.out.push_str(&line);
                self.out.push('\n');
            }
            self.out.push_str("```\n\n");
        }
        if self.in_list {
            self.out.push('\n');
            self.in_list = false;
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let style = paragraph.style().unwrap_or(styles::NORMAL);

        if style == styles::CODE {
            if self.in_list {
                self.end_group();
            }
            let text = paragraph.text();
            let line = if text.trim().is_empty() { String::new() } else { text };
            self.code_lines.push(line);
            // spacing after the last line closes the block
            let closes_block = paragraph
                .properties
                .spacing
                .and_then(|spacing| spacing.after)
                .is_some_and(|after| after > 0);
            if closes_block {
                self.end_group();
            }
            return;
        }

        let is_list = paragraph.properties.numbering.is_some() || style == styles::LIST_PARAGRAPH;
        if is_list {
            if !self.code_lines.is_empty() {
                self.end_group();
            }
            self.list_line(paragraph);
            return;
        }

        self.end_group();
        self.ordered_counter = 0;

        if let Some(level) = styles::heading_level(style) {
            self.heading(paragraph, level);
        } else if style == styles::QUOTE {
            let text = paragraph.text();
            if !text.trim().is_empty() {
                for line in text.lines() {
                    self.out.push_str("> ");
                    self.out.push_str(&escape_block_starts(&escape_inline(line)));
                    self.out.push('\n');
                }
                self.out.push('\n');
            }
        } else if paragraph.properties.border_bottom && paragraph.text().trim().is_empty() {
            self.out.push_str("---\n\n");
        } else {
            let text = self.inline(&paragraph.runs);
            if text.trim().is_empty() {
                return;
            }
            let text = match self.options.wrap_width {
                Some(width) => text
                    .split(HARD_BREAK)
                    .map(|segment| wrap(segment, width))
                    .collect::<Vec<_>>()
                    .join(HARD_BREAK),
                None => text,
            };
            self.out.push_str(&escape_block_starts(&text));
            self.out.push_str("\n\n");
        }
    }

    fn heading(&mut self, paragraph: &Paragraph, level: u8) {
        let text = self.inline(&paragraph.runs).replace(HARD_BREAK, " ");
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let level = level.min(6);
        if self.options.setext_headings && level <= 2 {
            let text = escape_block_starts(text);
            let underline = if level == 1 { "=" } else { "-" };
            let width = text.chars().count().max(3);
            self.out
                .push_str(&format!("{text}\n{}\n\n", underline.repeat(width)));
        } else {
            // a trailing `#` run would read as a closing sequence
            let text = match text.trim_end_matches('#').len() {
                cut if cut < text.len() => format!("{}\\{}", &text[..cut], &text[cut..]),
                _ => text.to_string(),
            };
            self.out
                .push_str(&format!("{} {text}\n\n", "#".repeat(level as usize)));
        }
    }

    fn list_line(&mut self, paragraph: &Paragraph) {
        let numbering = paragraph.properties.numbering;
        let ordered = numbering.is_some_and(|numbering| numbering.ordered);
        let top_level_start = numbering
            .filter(|numbering| numbering.level == 0)
            .and_then(|numbering| numbering.start);
        if let Some(start) = top_level_start {
            // a recorded start opens a new top-level list
            if self.in_list {
                self.end_group();
            }
            self.ordered_counter = start.saturating_sub(1);
        }
        let text = self.inline(&paragraph.runs).replace(HARD_BREAK, " ");
        let mut body = text.trim_start();
        let mut checkbox = None;
        for (glyph, checked) in [("☑", Some(true)), ("☐", Some(false)), ("•", None)] {
            if let Some(rest) = body.strip_prefix(glyph) {
                body = rest.trim_start();
                checkbox = checked;
                break;
            }
        }

        let marker = if ordered {
            self.ordered_counter += 1;
            format!("{}.", self.ordered_counter)
        } else {
            self.ordered_counter = 0;
            self.options.bullet_marker.to_string()
        };
        let task = match checkbox {
            Some(true) if self.options.task_lists => "[x] ",
            Some(false) if self.options.task_lists => "[ ] ",
            Some(true) => "☑ ",
            Some(false) => "☐ ",
            None => "",
        };
        let body = escape_block_starts(body.trim_end());
        self.out.push_str(&format!("{marker} {task}{body}\n"));
        self.in_list = true;
    }

    /// Inline Markdown for a run sequence.
    fn inline(&mut self, runs: &[Run]) -> String {
        let mut out = String::new();
        for run in merge_runs(runs) {
            if let Some(id) = &run.footnote {
                out.push_str(&escape_inline(&run.text));
                if self.options.footnotes {
                    let number = self.footnote_number(id);
                    out.push_str(&format!("[^{number}]"));
                }
                continue;
            }
            if let Some(index) = run.media {
                if let Some(image) = self.image_link(index) {
                    out.push_str(&image);
                    continue;
                }
            }
            out.push_str(&self.format_run(&run));
        }
        out.replace('\n', HARD_BREAK)
    }

    fn format_run(&self, run: &Run) -> String {
        let (lead, core, trail) = split_edges(&run.text);
        if core.is_empty() {
            return run.text.clone();
        }
        let properties = &run.properties;
        let is_code = properties
            .font_family
            .as_deref()
            .is_some_and(|family| self.options.is_code_font(family));
        let mut text = if is_code {
            code_span(core)
        } else {
            escape_inline(core)
        };
        let marker = self.options.emphasis_marker.to_string();
        let markers = match (properties.is_bold(), properties.is_italic()) {
            (true, true) => marker.repeat(3),
            (true, false) => marker.repeat(2),
            (false, true) => marker,
            (false, false) => String::new(),
        };
        text = format!("{markers}{text}{markers}");
        if properties.is_strike() {
            text = format!("~~{text}~~");
        }
        format!("{lead}{text}{trail}")
    }

    fn image_link(&self, index: usize) -> Option<String> {
        let images = &self.options.images;
        if !images.extract {
            return None;
        }
        let media = self.document.media.get(index)?;
        let target = extraction_target(
            &images.output_dir,
            index + 1,
            &media.source,
            &images.naming_pattern,
        );
        let link = link_path(&target, images.link_base.as_deref());
        Some(format!("![{}]({link})", media.alt))
    }

    fn footnote_number(&mut self, id: &str) -> usize {
        if let Some(number) = self.footnote_numbers.get(id) {
            return *number;
        }
        self.footnote_order.push(id.to_string());
        let number = self.footnote_order.len();
        self.footnote_numbers.insert(id.to_string(), number);
        number
    }

    fn table(&mut self, table: &Table) -> ConvertResult<()> {
        self.end_group();
        self.ordered_counter = 0;
        if !self.options.tables {
            debug!("skipping table: table export disabled");
            return Ok(());
        }
        let rendered = if self.options.gfm {
            gfm_table(table)
        } else {
            simple_table(table)
        };
        match rendered {
            Ok(text) => {
                self.out.push_str(&text);
                Ok(())
            }
            Err(err) => self.options.errors.report(ConvertError::model("table", err)),
        }
    }

    fn footnotes(&mut self) {
        if !self.options.footnotes || self.document.footnotes.is_empty() {
            return;
        }
        // unreferenced notes still get a number after the referenced ones
        for note in &self.document.footnotes {
            self.footnote_number(&note.id);
        }
        self.out.push_str("---\n\n");
        for (index, id) in self.footnote_order.iter().enumerate() {
            let Some(note) = self.document.footnote(id) else {
                debug!("footnote '{id}' is referenced but not defined");
                continue;
            };
            let text = note
                .paragraphs
                .iter()
                .map(Paragraph::text)
                .collect::<Vec<_>>()
                .join(" ");
            self.out.push_str(&format!(
                "[^{}]: {}\n",
                index + 1,
                escape_inline(text.trim())
            ));
        }
    }
}

/// Coalesce neighbouring plain runs with identical formatting.
fn merge_runs(runs: &[Run]) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        let plain = run.footnote.is_none() && run.media.is_none();
        if let Some(last) = merged.last_mut() {
            let last_plain = last.footnote.is_none() && last.media.is_none();
            if plain && last_plain && last.properties == run.properties {
                last.text.push_str(&run.text);
                continue;
            }
        }
        merged.push(run.clone());
    }
    merged
}

/// Backslash-escape inline punctuation that would otherwise start emphasis,
/// code, strikethrough, math, raw HTML, links, footnote references or
/// entity references.
pub fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let next = chars.peek().map(|(_, next)| *next);
        let escape = match c {
            '\\' | '`' | '*' | '_' | '<' | '~' | '$' => true,
            '[' => next == Some('^'),
            ']' => matches!(next, Some('(' | '[' | ':')),
            '&' => looks_like_entity(&text[index + 1..]),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `amp;`, `#35;`, `#x23;` ...
fn looks_like_entity(rest: &str) -> bool {
    match rest.find(';') {
        Some(end) if end > 0 => rest[..end]
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_alphanumeric() || (i == 0 && c == '#')),
        _ => false,
    }
}

/// Escape block syntax at the start of each line: ATX heading markers,
/// quote markers, bullet and ordered list markers, and setext underlines.
/// Leading indentation is dropped so no line turns into indented code.
pub fn escape_block_starts(text: &str) -> String {
    text.split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let line = line.trim_start_matches([' ', '\t']);
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let blank_or_end = |c: Option<char>| c.map_or(true, |c| c == ' ' || c == '\t');

    let hashes = line.chars().take_while(|c| *c == '#').count();
    let marker = match first {
        '#' => hashes <= 6 && blank_or_end(line[hashes..].chars().next()),
        '>' => true,
        '-' | '+' | '*' => blank_or_end(chars.next()),
        _ => false,
    };
    let underline = matches!(first, '-' | '=')
        && line.trim_end().chars().all(|c| c == first);
    if marker || underline {
        return format!("\\{line}");
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if (1..=9).contains(&digits) {
        let mut rest = line[digits..].chars();
        if matches!(rest.next(), Some('.' | ')')) && blank_or_end(rest.next()) {
            return format!("{}\\{}", &line[..digits], &line[digits..]);
        }
    }
    line.to_string()
}

/// Code span whose backtick fence is longer than any backtick run inside.
pub fn code_span(code: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in code.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    let fence = "`".repeat(longest + 1);
    let pad = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{code}{pad}{fence}")
}

fn cell_texts(table: &Table, row: usize) -> Vec<String> {
    let mut texts = Vec::new();
    for cell in &table.rows[row].cells {
        let text = if cell.is_merge_continuation() {
            String::new()
        } else {
            escape_inline(&cell.text().replace('\n', " ")).replace('|', "\\|")
        };
        texts.push(text);
        for _ in 1..cell.properties.grid_span.unwrap_or(1) {
            texts.push(String::new());
        }
    }
    texts
}

fn check_rows(table: &Table) -> Result<(), ModelError> {
    if table.rows.is_empty() || table.rows[0].cells.is_empty() {
        return Err(ModelError::InvalidTableShape {
            rows: table.rows.len(),
            cols: table.column_count(),
        });
    }
    Ok(())
}

fn gfm_table(table: &Table) -> Result<String, ModelError> {
    check_rows(table)?;
    let header = cell_texts(table, 0);
    let columns = header.len();
    let mut out = String::new();

    out.push_str(&pipe_row(&header, columns));
    for cell in &table.rows[0].cells {
        let separator = match cell.alignment() {
            Some(Alignment::Center) => ":---:",
            Some(Alignment::Right) => "----:",
            _ => "-----",
        };
        for _ in 0..cell.properties.grid_span.unwrap_or(1) {
            out.push('|');
            out.push_str(separator);
        }
    }
    out.push_str("|\n");
    for row in 1..table.rows.len() {
        out.push_str(&pipe_row(&cell_texts(table, row), columns));
    }
    out.push('\n');
    Ok(out)
}

fn pipe_row(cells: &[String], columns: usize) -> String {
    let mut out = String::from("|");
    for index in 0..columns.max(cells.len()) {
        let text = cells.get(index).map(String::as_str).unwrap_or("");
        out.push_str(&format!(" {text} |"));
    }
    out.push('\n');
    out
}

fn simple_table(table: &Table) -> Result<String, ModelError> {
    check_rows(table)?;
    let mut out = String::new();
    let header: Vec<String> = cell_texts(table, 0)
        .into_iter()
        .map(|text| if text.is_empty() { text } else { format!("**{text}**") })
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');
    for row in 1..table.rows.len() {
        out.push_str(&cell_texts(table, row).join(" | "));
        out.push('\n');
    }
    out.push('\n');
    Ok(out)
}
