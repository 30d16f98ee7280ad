use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Structure representing an Int64 column
#[derive(Debug, Clone, PartialEq)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
    pub(crate) name: Option<String>,
}

impl Int64Column {
    /// Create a new Int64Column
    pub fn new(data: Vec<i64>) -> Self {
        Self {
            data: data.into(),
            name: None,
        }
    }

    /// Create an Int64Column with a name
    pub fn with_name(data: Vec<i64>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: Some(name.into()),
        }
    }

    /// Set the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Get the name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get data at the specified index
    pub fn get(&self, index: usize) -> Result<i64> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }
        Ok(self.data[index])
    }

    pub fn values(&self) -> &[i64] {
        &self.data
    }

    /// Convert to f64 values
    pub fn to_f64(&self) -> Vec<f64> {
        self.data.iter().map(|&v| v as f64).collect()
    }

    /// Keep only the entries where `mask` is true. The mask length is
    /// validated by the caller.
    pub(crate) fn take_mask(&self, mask: &[bool]) -> Self {
        let data: Vec<i64> = self
            .data
            .iter()
            .zip(mask)
            .filter_map(|(&v, &keep)| if keep { Some(v) } else { None })
            .collect();
        Self {
            data: data.into(),
            name: self.name.clone(),
        }
    }
}
