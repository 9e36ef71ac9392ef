//! Spreadsheet cell references.
//!
//! Mapping documents locate labels and values with tokens such as `"B7"`:
//! a single uppercase column letter followed by a 1-based row number.
//! Multi-letter columns (`"AA1"`) are not part of the grammar, so only the
//! first 26 columns of a sheet are addressable. Row numbers are held as `u64`;
//! a row number above `u64::MAX` is rejected.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::enums::TableOrientation;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLUMNS: usize = 26;

/// Errors produced while resolving a cell reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Token does not match `^[A-Z][1-9][0-9]*$`.
    #[error(
        "invalid cell location '{token}': expected one uppercase column letter followed by a positive row number"
    )]
    Invalid { token: String },
}

impl LocationError {
    fn invalid(token: &str) -> Self {
        Self::Invalid {
            token: token.to_string(),
        }
    }
}

/// A resolved cell reference with zero-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    row: u64,
    column: u8,
}

impl CellRef {
    /// Parse a location token such as `"B7"` into zero-based `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Invalid`] for lowercase or multi-letter
    /// columns, missing digits, a zero row, leading zeros, any trailing
    /// characters, or a row number that does not fit in a `u64`.
    pub fn parse(token: &str) -> Result<Self, LocationError> {
        let bytes = token.as_bytes();
        let Some((&letter, digits)) = bytes.split_first() else {
            return Err(LocationError::invalid(token));
        };
        if !letter.is_ascii_uppercase() {
            return Err(LocationError::invalid(token));
        }
        match digits.first() {
            Some(b'1'..=b'9') => {}
            _ => return Err(LocationError::invalid(token)),
        }
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(LocationError::invalid(token));
        }
        // Digits are ASCII so the slice is valid UTF-8.
        let row_number: u64 = token[1..]
            .parse()
            .map_err(|_| LocationError::invalid(token))?;
        Ok(Self {
            row: row_number - 1,
            column: letter - b'A',
        })
    }

    /// Build a reference from zero-based coordinates.
    ///
    /// Returns `None` when the column is beyond `Z` or the row cannot be
    /// rendered as a 1-based number.
    pub fn new(row: usize, column: usize) -> Option<Self> {
        if column >= MAX_COLUMNS {
            return None;
        }
        let row = u64::try_from(row).ok().filter(|r| *r < u64::MAX)?;
        Some(Self {
            row,
            column: column as u8,
        })
    }

    /// Zero-based row index, saturating at `usize::MAX` on narrow targets.
    pub fn row(&self) -> usize {
        usize::try_from(self.row).unwrap_or(usize::MAX)
    }

    /// Zero-based column index.
    pub fn column(&self) -> usize {
        usize::from(self.column)
    }

    /// Zero-based `(row, column)` pair.
    pub fn position(&self) -> (usize, usize) {
        (self.row(), self.column())
    }

    /// Position `step` cells away from this reference in the direction the
    /// orientation reads values: along the row for `rows`, down the column
    /// for `columns`.
    ///
    /// The result is a raw grid position and may lie beyond column `Z`.
    pub fn step(&self, orientation: TableOrientation, step: usize) -> (usize, usize) {
        match orientation {
            TableOrientation::Rows => (self.row(), self.column() + step),
            TableOrientation::Columns => (self.row().saturating_add(step), self.column()),
        }
    }

    /// Column letter of this reference.
    pub fn column_letter(&self) -> char {
        char::from(b'A' + self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
