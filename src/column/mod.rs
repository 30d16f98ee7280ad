//! Typed column storage
//!
//! Columns are immutable, `Arc`-backed vectors of one of four supported
//! value types. Cloning a column is cheap; filtering produces a new column
//! and never mutates the original.

pub mod boolean_column;
pub mod float64_column;
pub mod int64_column;
pub mod string_column;

pub use boolean_column::BooleanColumn;
pub use float64_column::Float64Column;
pub use int64_column::Int64Column;
pub use string_column::StringColumn;

use crate::core::error::{Error, Result};

/// Enum to identify column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
}

/// Enum representing a column of any supported type
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Int64Column),
    Float64(Float64Column),
    String(StringColumn),
    Boolean(BooleanColumn),
}

impl Column {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(col) => col.len(),
            Column::Float64(col) => col.len(),
            Column::String(col) => col.len(),
            Column::Boolean(col) => col.len(),
        }
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Returns the name of the column
    pub fn name(&self) -> Option<&str> {
        match self {
            Column::Int64(col) => col.name.as_deref(),
            Column::Float64(col) => col.name.as_deref(),
            Column::String(col) => col.name.as_deref(),
            Column::Boolean(col) => col.name.as_deref(),
        }
    }

    /// Set the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Column::Int64(col) => col.set_name(name),
            Column::Float64(col) => col.set_name(name),
            Column::String(col) => col.set_name(name),
            Column::Boolean(col) => col.set_name(name),
        }
    }

    /// Casts to Int64Column
    pub fn as_int64(&self) -> Option<&Int64Column> {
        match self {
            Column::Int64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to Float64Column
    pub fn as_float64(&self) -> Option<&Float64Column> {
        match self {
            Column::Float64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to StringColumn
    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to BooleanColumn
    pub fn as_boolean(&self) -> Option<&BooleanColumn> {
        match self {
            Column::Boolean(col) => Some(col),
            _ => None,
        }
    }

    /// Convert a numeric column into f64 values
    pub fn to_f64(&self) -> Result<Vec<f64>> {
        match self {
            Column::Int64(col) => Ok(col.to_f64()),
            Column::Float64(col) => Ok(col.values().to_vec()),
            other => Err(Error::Cast(format!(
                "cannot convert {:?} column to f64",
                other.column_type()
            ))),
        }
    }

    /// Keep only the entries where `mask` is true
    pub fn filter(&self, mask: &[bool]) -> Result<Column> {
        if mask.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        Ok(match self {
            Column::Int64(col) => Column::Int64(col.take_mask(mask)),
            Column::Float64(col) => Column::Float64(col.take_mask(mask)),
            Column::String(col) => Column::String(col.take_mask(mask)),
            Column::Boolean(col) => Column::Boolean(col.take_mask(mask)),
        })
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}
