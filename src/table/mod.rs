//! Tabular container backends
//!
//! The query layer never talks to a concrete container directly; it goes
//! through the [`Tabular`] capability trait. Three shapes implement it:
//! - [`RecordArray`]: row-oriented records sharing one field schema
//! - [`Table`]: labelled column-oriented table
//! - [`DataFrame`]: labelled columns plus a row-label index
//!
//! All operations produce new values; no implementation mutates or caches
//! the container it is given.

pub mod frame;
pub mod labelled;
pub mod records;

pub use frame::DataFrame;
pub use labelled::Table;
pub use records::{RecordArray, Value};

use crate::column::Column;
use crate::core::error::Result;

/// Capability interface implemented by every supported table shape
pub trait Tabular: Clone {
    /// Number of rows
    fn nrows(&self) -> usize;

    /// Column names, in table order
    fn column_names(&self) -> &[String];

    /// Fetch one column by name
    fn column(&self, name: &str) -> Result<Column>;

    /// Keep only the rows where `mask` is true, preserving the column set
    /// and the original order of surviving rows
    fn select(&self, mask: &[bool]) -> Result<Self>;
}
