//! In-memory workbook read through calamine.
//!
//! Sheets are stored as absolute-coordinate grids: row 0 / column 0 is
//! spreadsheet cell `A1` regardless of where the used range starts, so cell
//! references from mapping documents index the grid directly.

use std::fmt;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use oims_model::CellRef;

use crate::error::{IngestError, Result};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Cell holding a spreadsheet error such as `#DIV/0!`.
    Error(String),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Rendered text of a non-blank cell.
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => f.write_str(&format_float(*value)),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Error(err) => f.write_str(err),
        }
    }
}

/// Render integral floats without a fractional part (`2.0` → `"2"`).
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(text) => CellValue::Text(text.clone()),
            Data::Int(value) => CellValue::Int(*value),
            Data::Float(value) => CellValue::Float(*value),
            Data::Bool(value) => CellValue::Bool(*value),
            Data::Error(err) => CellValue::Error(err.to_string()),
            Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
                CellValue::Text(data.to_string())
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }
}

/// One row of a sheet read with its first row as column labels.
///
/// Only non-blank cells under a non-blank label are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    /// Zero-based grid row the record was read from.
    pub row: usize,
    /// `(label, value)` pairs in column order.
    pub fields: Vec<(String, String)>,
}

impl SheetRecord {
    /// Value under a label, if present.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }
}

/// A worksheet as an absolute-coordinate grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a sheet from string rows; empty strings become empty cells.
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| CellValue::from(cell.as_ref()))
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of grid rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at a zero-based position; out-of-range positions are empty.
    pub fn get(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Cell addressed by a resolved reference.
    pub fn cell(&self, cell: CellRef) -> &CellValue {
        let (row, column) = cell.position();
        self.get(row, column)
    }

    /// Rows after the first, keyed by the labels of the first row.
    pub fn records(&self) -> Vec<SheetRecord> {
        let Some(header) = self.rows.first() else {
            return Vec::new();
        };
        let labels: Vec<Option<String>> = header
            .iter()
            .map(|cell| cell.text().map(|t| t.trim().to_string()))
            .collect();

        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(row_idx, cells)| {
                let fields: Vec<(String, String)> = cells
                    .iter()
                    .enumerate()
                    .filter_map(|(col_idx, cell)| {
                        let label = labels.get(col_idx)?.as_ref()?;
                        Some((label.clone(), cell.text()?))
                    })
                    .collect();
                (!fields.is_empty()).then_some(SheetRecord {
                    row: row_idx,
                    fields,
                })
            })
            .collect()
    }
}

/// A fully loaded, read-only workbook.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    path: Option<PathBuf>,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open a workbook (xlsx, xlsm, xlsb, xls or ods) and load every sheet.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut workbook = open_workbook_auto(path).map_err(|source| IngestError::WorkbookOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range =
                workbook
                    .worksheet_range(&name)
                    .map_err(|source| IngestError::SheetRead {
                        path: path.to_path_buf(),
                        sheet: name.clone(),
                        source,
                    })?;

            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));
            let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
            for row in range.rows() {
                let mut cells = vec![CellValue::Empty; col_offset];
                cells.extend(row.iter().map(CellValue::from));
                rows.push(cells);
            }
            tracing::debug!(sheet = %name, rows = rows.len(), "Loaded sheet");
            sheets.push(Sheet::new(name, rows));
        }

        tracing::info!(
            path = %path.display(),
            sheet_count = sheets.len(),
            "Opened workbook"
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            sheets,
        })
    }

    /// Build a workbook from sheets already in memory.
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { path: None, sheets }
    }

    /// Source path, when opened from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Sheet by name, failing with [`IngestError::SheetNotFound`].
    pub fn require_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheet(name).ok_or_else(|| IngestError::SheetNotFound {
            sheet: name.to_string(),
        })
    }
}
