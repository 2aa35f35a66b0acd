//! Read access to one provider row, independent of where the row came from.

use std::collections::HashMap;

use rusqlite::types::ValueRef;
use thiserror::Error;

use super::columns::Column;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("column {0} is not in the projection")]
    MissingColumn(&'static str),

    #[error("column {column} cannot be read: {reason}")]
    BadValue { column: &'static str, reason: String },
}

/// A single row of a provider cursor.
///
/// Accessors return `Ok(None)` for SQL NULL and `Err(RowError::MissingColumn)`
/// when the column was not selected at all.
pub trait DataRow {
    fn text(&self, column: Column) -> Result<Option<String>, RowError>;
    fn int(&self, column: Column) -> Result<Option<i64>, RowError>;
}

impl DataRow for rusqlite::Row<'_> {
    fn text(&self, column: Column) -> Result<Option<String>, RowError> {
        let value = self.get_ref(column.name()).map_err(|e| sql_error(column, e))?;
        match value {
            ValueRef::Null => Ok(None),
            ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| bad_value(column, e.to_string())),
            ValueRef::Integer(i) => Ok(Some(i.to_string())),
            ValueRef::Real(f) => Ok(Some(f.to_string())),
            ValueRef::Blob(_) => Err(bad_value(column, "blob where text was expected")),
        }
    }

    fn int(&self, column: Column) -> Result<Option<i64>, RowError> {
        let value = self.get_ref(column.name()).map_err(|e| sql_error(column, e))?;
        match value {
            ValueRef::Null => Ok(None),
            ValueRef::Integer(i) => Ok(Some(i)),
            ValueRef::Real(f) => Ok(Some(f as i64)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .map(Some)
                .ok_or_else(|| bad_value(column, "text is not an integer")),
            ValueRef::Blob(_) => Err(bad_value(column, "blob where integer was expected")),
        }
    }
}

fn sql_error(column: Column, e: rusqlite::Error) -> RowError {
    match e {
        rusqlite::Error::InvalidColumnName(_) => RowError::MissingColumn(column.name()),
        other => bad_value(column, other.to_string()),
    }
}

fn bad_value(column: Column, reason: impl Into<String>) -> RowError {
    RowError::BadValue {
        column: column.name(),
        reason: reason.into(),
    }
}

/// A cell of a `MemoryRow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Int(i64),
    Text(String),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

/// An owned row, used for rows that do not come from SQLite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRow {
    cells: HashMap<Column, Cell>,
}

impl MemoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: Column, cell: impl Into<Cell>) -> Self {
        self.cells.insert(column, cell.into());
        self
    }

    pub fn with_null(mut self, column: Column) -> Self {
        self.cells.insert(column, Cell::Null);
        self
    }
}

impl DataRow for MemoryRow {
    fn text(&self, column: Column) -> Result<Option<String>, RowError> {
        match self.cells.get(&column) {
            None => Err(RowError::MissingColumn(column.name())),
            Some(Cell::Null) => Ok(None),
            Some(Cell::Text(s)) => Ok(Some(s.clone())),
            Some(Cell::Int(i)) => Ok(Some(i.to_string())),
        }
    }

    fn int(&self, column: Column) -> Result<Option<i64>, RowError> {
        match self.cells.get(&column) {
            None => Err(RowError::MissingColumn(column.name())),
            Some(Cell::Null) => Ok(None),
            Some(Cell::Int(i)) => Ok(Some(*i)),
            Some(Cell::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| bad_value(column, e.to_string())),
        }
    }
}
