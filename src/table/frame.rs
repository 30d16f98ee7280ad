//! Data frame: labelled columns plus a row-label index

use std::collections::HashMap;

use super::Tabular;
use crate::column::Column;
use crate::core::error::{Error, Result};

/// Column-oriented data frame whose rows carry labels.
///
/// Selection keeps the labels of the surviving rows, so a filtered frame
/// still identifies its rows in terms of the original.
#[derive(Debug, Clone)]
pub struct DataFrame {
    columns: HashMap<String, Column>,
    order: Vec<String>,
    index: Vec<String>,
}

impl DataFrame {
    /// Create a new empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            order: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Create a DataFrame with explicit row labels
    pub fn with_index(index: Vec<String>) -> Self {
        Self {
            columns: HashMap::new(),
            order: Vec::new(),
            index,
        }
    }

    /// Add a column to the frame.
    ///
    /// With an explicit index, the column length must match it; otherwise
    /// the first column fixes the row count and positional labels are
    /// generated.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let mut column = column.into();

        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if (!self.order.is_empty() || !self.index.is_empty()) && column.len() != self.index.len() {
            return Err(Error::InconsistentRowCount {
                expected: self.index.len(),
                found: column.len(),
            });
        }

        if self.order.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).map(|i| i.to_string()).collect();
        }
        column.set_name(name.clone());
        self.columns.insert(name.clone(), column);
        self.order.push(name);
        Ok(())
    }

    /// Row labels
    pub fn index(&self) -> &[String] {
        &self.index
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

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl Tabular for DataFrame {
    fn nrows(&self) -> usize {
        self.index.len()
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
        if mask.len() != self.index.len() {
            return Err(Error::LengthMismatch {
                expected: self.index.len(),
                actual: mask.len(),
            });
        }
        let mut columns = HashMap::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            columns.insert(name.clone(), column.filter(mask)?);
        }
        let index = self
            .index
            .iter()
            .zip(mask)
            .filter_map(|(label, &keep)| if keep { Some(label.clone()) } else { None })
            .collect();
        Ok(Self {
            columns,
            order: self.order.clone(),
            index,
        })
    }
}
