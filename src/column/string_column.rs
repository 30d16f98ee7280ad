use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Structure representing a String column
#[derive(Debug, Clone, PartialEq)]
pub struct StringColumn {
    pub(crate) data: Arc<[String]>,
    pub(crate) name: Option<String>,
}

impl StringColumn {
    /// Create a new StringColumn
    pub fn new(data: Vec<String>) -> Self {
        Self {
            data: data.into(),
            name: None,
        }
    }

    /// Create a StringColumn from string slices
    pub fn from_strs(data: &[&str]) -> Self {
        Self::new(data.iter().map(|s| s.to_string()).collect())
    }

    /// Create a StringColumn with a name
    pub fn with_name(data: Vec<String>, name: impl Into<String>) -> Self {
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
    pub fn get(&self, index: usize) -> Result<&str> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }
        Ok(&self.data[index])
    }

    pub fn values(&self) -> &[String] {
        &self.data
    }

    pub(crate) fn take_mask(&self, mask: &[bool]) -> Self {
        let data: Vec<String> = self
            .data
            .iter()
            .zip(mask)
            .filter_map(|(v, &keep)| if keep { Some(v.clone()) } else { None })
            .collect();
        Self {
            data: data.into(),
            name: self.name.clone(),
        }
    }
}
