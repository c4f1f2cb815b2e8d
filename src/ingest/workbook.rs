//! Workbook Ingestor
//!
//! Decodes xlsx bytes into a sheet/cell model, resolves merged-cell ranges and
//! yields ordered row records keyed by column letter.

use crate::error::IngestError;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::debug;

/// Zero-based (row, column) coordinate
pub type CellRef = (u32, u32);

/// Rectangle of merged cells, both corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub start: CellRef,
    pub end: CellRef,
}

impl MergeRegion {
    pub fn new(start: CellRef, end: CellRef) -> Self {
        Self { start, end }
    }
}

/// A decoded workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// One worksheet: sparse cell values plus its merge regions
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<CellRef, String>,
    merges: Vec<MergeRegion>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    /// Build a sheet from a dense grid, row 0 first. Empty strings are absent cells.
    pub fn from_grid<R: AsRef<[&'static str]>>(name: impl Into<String>, grid: &[R]) -> Self {
        let mut sheet = Sheet::new(name);
        for (r, row) in grid.iter().enumerate() {
            for (c, value) in row.as_ref().iter().enumerate() {
                sheet.set(r as u32, c as u32, *value);
            }
        }
        sheet
    }

    pub fn set(&mut self, row: u32, col: u32, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    pub fn merge(&mut self, region: MergeRegion) {
        self.merges.push(region);
    }

    /// Raw value of a cell, ignoring merges
    pub fn value(&self, row: u32, col: u32) -> &str {
        self.cells.get(&(row, col)).map(String::as_str).unwrap_or("")
    }

    /// Cell map with every merge rectangle filled from its top-left cell.
    ///
    /// Cells inside a merge that already hold a value keep it.
    fn resolved_cells(&self) -> BTreeMap<CellRef, String> {
        let mut cells = self.cells.clone();
        for region in &self.merges {
            let Some(anchor) = self.cells.get(&region.start).cloned() else {
                continue;
            };
            for row in region.start.0..=region.end.0 {
                for col in region.start.1..=region.end.1 {
                    cells.entry((row, col)).or_insert_with(|| anchor.clone());
                }
            }
        }
        cells
    }

    /// Non-blank rows in top-to-bottom order, merges resolved
    pub fn rows(&self) -> Vec<RowRecord> {
        let mut rows: BTreeMap<u32, RowRecord> = BTreeMap::new();
        for ((row, col), value) in self.resolved_cells() {
            rows.entry(row)
                .or_insert_with(|| RowRecord::new(row + 1))
                .cells
                .insert(column_letter(col), value);
        }
        rows.into_values().filter(|row| !row.is_blank()).collect()
    }
}

/// One spreadsheet row with its cells keyed by column letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// 1-based row number in the source sheet
    pub number: u32,
    cells: BTreeMap<String, String>,
}

impl RowRecord {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, column: &str, value: impl Into<String>) -> Self {
        self.cells.insert(column.to_string(), value.into());
        self
    }

    /// Value of the given column, or "" when the cell is missing
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// (column letter, value) pairs in column order
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// Spreadsheet column letter for a zero-based column index (0 -> A, 26 -> AA)
pub fn column_letter(col: u32) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Decode xlsx bytes into a [`Workbook`]
pub fn decode_workbook(bytes: &[u8]) -> Result<Workbook, IngestError> {
    let mut xlsx: Xlsx<Cursor<&[u8]>> = open_workbook_from_rs(Cursor::new(bytes))?;
    xlsx.load_merged_regions()?;

    let mut sheets = Vec::new();
    for name in xlsx.sheet_names() {
        let range = xlsx.worksheet_range(&name)?;
        let mut sheet = Sheet::new(name.clone());

        if let Some((first_row, first_col)) = range.start() {
            for (r, row) in range.rows().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    sheet.set(first_row + r as u32, first_col + c as u32, cell_text(cell));
                }
            }
        }

        for (_, _, dims) in xlsx.merged_regions_by_sheet(&name) {
            sheet.merge(MergeRegion::new(dims.start, dims.end));
        }

        debug!(
            "Decoded sheet '{}': {} cells, {} merged regions",
            sheet.name,
            sheet.cells.len(),
            sheet.merges.len()
        );
        sheets.push(sheet);
    }

    Ok(Workbook { sheets })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
