//! Tables: grid, rows, cells and merge mechanics.

use serde::{Deserialize, Serialize};

use super::document::{Alignment, Paragraph, Run, RunProperties};
use super::sink::{ModelError, ModelResult};

/// Usable text width of a default page, in twentieths of a point.
const TABLE_WIDTH: u32 = 9000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub properties: TableProperties,
    /// Column widths, one per grid column
    pub grid: Vec<u32>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub header: bool,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub properties: CellProperties,
    pub paragraphs: Vec<Paragraph>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_span: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_merge: Option<VMerge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VMerge {
    Restart,
    Continue,
}

impl Table {
    /// Create a `rows × cols` table of empty cells with an even column grid.
    pub fn new(rows: usize, cols: usize) -> ModelResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ModelError::InvalidTableShape { rows, cols });
        }
        let width = TABLE_WIDTH / cols as u32;
        let row = TableRow {
            header: false,
            cells: (0..cols).map(|_| TableCell::with_width(width)).collect(),
        };
        Ok(Table {
            properties: TableProperties {
                style: Some("TableGrid".to_string()),
                width: Some(TABLE_WIDTH),
            },
            grid: vec![width; cols],
            rows: vec![row; rows],
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.grid.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> ModelResult<&TableCell> {
        let (rows, cols) = (self.row_count(), self.column_count());
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(col))
            .ok_or(ModelError::CellOutOfRange {
                row,
                col,
                rows,
                cols,
            })
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> ModelResult<&mut TableCell> {
        let (rows, cols) = (self.row_count(), self.column_count());
        self.rows
            .get_mut(row)
            .and_then(|r| r.cells.get_mut(col))
            .ok_or(ModelError::CellOutOfRange {
                row,
                col,
                rows,
                cols,
            })
    }

    pub fn set_header_row(&mut self, row: usize) -> ModelResult<()> {
        let (rows, cols) = (self.row_count(), self.column_count());
        let target = self.rows.get_mut(row).ok_or(ModelError::CellOutOfRange {
            row,
            col: 0,
            rows,
            cols,
        })?;
        target.header = true;
        Ok(())
    }

    /// Apply a horizontal alignment to every cell of a column.
    pub fn set_column_alignment(&mut self, col: usize, alignment: Alignment) -> ModelResult<()> {
        let cols = self.column_count();
        if col >= cols {
            return Err(ModelError::ColumnOutOfRange { col, cols });
        }
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(col) {
                cell.set_alignment(alignment);
            }
        }
        Ok(())
    }

    pub fn set_cell_text(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        properties: RunProperties,
    ) -> ModelResult<()> {
        self.cell_mut(row, col)?.set_text(text, properties);
        Ok(())
    }

    /// Merge `span` cells of a row starting at `col` into one grid-spanning cell.
    ///
    /// The covered cells are removed from the row; their text is discarded.
    pub fn merge_horizontal(&mut self, row: usize, col: usize, span: usize) -> ModelResult<()> {
        let cols = self.column_count();
        let rows = self.row_count();
        let target = self.rows.get_mut(row).ok_or(ModelError::CellOutOfRange {
            row,
            col,
            rows,
            cols,
        })?;
        if span < 2 || col + span > target.cells.len() {
            return Err(ModelError::InvalidSpan {
                col,
                span,
                cols: target.cells.len(),
            });
        }
        let removed: Vec<TableCell> = target.cells.drain(col + 1..col + span).collect();
        let cell = &mut target.cells[col];
        let extra_width: u32 = removed.iter().filter_map(|c| c.properties.width).sum();
        cell.properties.grid_span = Some(span);
        cell.properties.width = cell.properties.width.map(|w| w + extra_width);
        Ok(())
    }

    /// Merge a column vertically from `first_row` through `last_row` (inclusive).
    pub fn merge_vertical(
        &mut self,
        col: usize,
        first_row: usize,
        last_row: usize,
    ) -> ModelResult<()> {
        if last_row <= first_row {
            return Err(ModelError::InvalidSpan {
                col,
                span: last_row.saturating_sub(first_row) + 1,
                cols: self.column_count(),
            });
        }
        for row in first_row..=last_row {
            let cell = self.cell_mut(row, col)?;
            cell.properties.v_merge = Some(if row == first_row {
                VMerge::Restart
            } else {
                VMerge::Continue
            });
        }
        Ok(())
    }

    /// Append a row shaped like `template`: properties are copied, text is cleared.
    pub fn append_row_like(&mut self, template: usize) -> ModelResult<&mut TableRow> {
        let (rows, cols) = (self.row_count(), self.column_count());
        let source = self.rows.get(template).ok_or(ModelError::CellOutOfRange {
            row: template,
            col: 0,
            rows,
            cols,
        })?;
        let mut row = source.clone();
        row.header = false;
        for cell in &mut row.cells {
            cell.clear_text();
            cell.properties.v_merge = None;
        }
        self.rows.push(row);
        let last = self.rows.len() - 1;
        Ok(&mut self.rows[last])
    }
}

impl TableCell {
    pub fn new() -> Self {
        let mut paragraph = Paragraph::new();
        paragraph.ensure_run();
        TableCell {
            properties: CellProperties::default(),
            paragraphs: vec![paragraph],
            tables: Vec::new(),
        }
    }

    fn with_width(width: u32) -> Self {
        let mut cell = Self::new();
        cell.properties.width = Some(width);
        cell
    }

    /// Cell text, paragraphs joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.paragraphs
            .first()
            .and_then(|paragraph| paragraph.properties.alignment)
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        for paragraph in &mut self.paragraphs {
            paragraph.properties.alignment = Some(alignment);
        }
    }

    /// Replace the cell content with one paragraph holding one run.
    pub fn set_text(&mut self, text: &str, properties: RunProperties) {
        let mut paragraph = Paragraph {
            properties: self
                .paragraphs
                .first()
                .map(|p| p.properties.clone())
                .unwrap_or_default(),
            runs: Vec::new(),
        };
        paragraph.push_run(Run::with_properties(text, properties));
        self.paragraphs = vec![paragraph];
    }

    fn clear_text(&mut self) {
        let properties = self
            .paragraphs
            .first()
            .map(|p| p.properties.clone())
            .unwrap_or_default();
        let mut paragraph = Paragraph {
            properties,
            runs: Vec::new(),
        };
        paragraph.ensure_run();
        self.paragraphs = vec![paragraph];
        self.tables.clear();
    }

    pub fn is_merge_continuation(&self) -> bool {
        self.properties.v_merge == Some(VMerge::Continue)
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self::new()
    }
}
