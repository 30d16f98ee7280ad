//! Labelled column-oriented table

use std::collections::HashMap;

use super::Tabular;
use crate::column::Column;
use crate::core::error::{Error, Result};

/// Column-oriented table addressed by column label
#[derive(Debug, Clone)]
pub struct Table {
    columns: HashMap<String, Column>,
    order: Vec<String>,
    nrows: usize,
}

impl Table {
    /// Create a new empty Table
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            order: Vec::new(),
            nrows: 0,
        }
    }

    /// Add a column to the table.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let mut column = column.into();

        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if !self.order.is_empty() && column.len() != self.nrows {
            return Err(Error::InconsistentRowCount {
                expected: self.nrows,
                found: column.len(),
            });
        }

        if self.order.is_empty() {
            self.nrows = column.len();
        }
        column.set_name(name.clone());
        self.columns.insert(name.clone(), column);
        self.order.push(name);
        Ok(())
    }

    /// Check whether a column exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.order.len()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Tabular for Table {
    fn nrows(&self) -> usize {
        self.nrows
    }

    fn column_names(&self) -> &[String] {
        &self.order
    }

    fn column(&self, name: &str) -> Result<Column> {
        self.columns
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    fn select(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows {
            return Err(Error::LengthMismatch {
                expected: self.nrows,
                actual: mask.len(),
            });
        }
        let mut columns = HashMap::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            columns.insert(name.clone(), column.filter(mask)?);
        }
        Ok(Self {
            columns,
            order: self.order.clone(),
            nrows: mask.iter().filter(|&&keep| keep).count(),
        })
    }
}
