use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Structure representing a Boolean column
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanColumn {
    pub(crate) data: Arc<[bool]>,
    pub(crate) name: Option<String>,
}

impl BooleanColumn {
    /// Create a new BooleanColumn
    pub fn new(data: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            name: None,
        }
    }

    /// Create a BooleanColumn with a name
    pub fn with_name(data: Vec<bool>, name: impl Into<String>) -> Self {
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
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }
        Ok(self.data[index])
    }

    pub fn values(&self) -> &[bool] {
        &self.data
    }

    /// Copy the values into a plain boolean vector
    pub fn to_vec(&self) -> Vec<bool> {
        self.data.to_vec()
    }

    pub(crate) fn take_mask(&self, mask: &[bool]) -> Self {
        let data: Vec<bool> = self
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
