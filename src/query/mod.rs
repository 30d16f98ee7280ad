//! Composable boolean queries over tabular data
//!
//! This module provides the public query surface:
//! - base: the [`Query`] facade (mask/filter/count, operator overloads)
//! - predicate: the immutable predicate node tree
//! - maker: convenience predicate factories
//!
//! The free functions below mirror `Query::all(..).mask(..)` and friends
//! for one-shot use.

pub mod base;
pub mod maker;
pub mod predicate;

pub use base::Query;
pub use predicate::{ColumnFn, Combinator, Predicate};

use crate::core::error::Result;
use crate::table::Tabular;

/// Mask `table` with the conjunction of `queries`.
///
/// Equivalent to `Query::all(queries).mask(table)`.
pub fn mask<T: Tabular>(table: &T, queries: impl IntoIterator<Item = Query>) -> Result<Vec<bool>> {
    Query::all(queries).mask(table)
}

/// Filter `table` with the conjunction of `queries`.
///
/// Equivalent to `Query::all(queries).filter(table)`.
pub fn filter<T: Tabular>(table: &T, queries: impl IntoIterator<Item = Query>) -> Result<T> {
    Query::all(queries).filter(table)
}

/// Count the rows of `table` matching the conjunction of `queries`.
///
/// Equivalent to `Query::all(queries).count(table)`.
pub fn count<T: Tabular>(table: &T, queries: impl IntoIterator<Item = Query>) -> Result<usize> {
    Query::all(queries).count(table)
}
