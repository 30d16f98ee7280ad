//! tablequery: composable boolean queries over tabular data
//!
//! Build an immutable [`Query`] once — from numexpr-style string
//! expressions, callables over named columns, or the [`query::maker`]
//! factories — combine it algebraically with `&`, `|`, `^`, `!`, and
//! evaluate it against any supported table shape to get a boolean mask, a
//! filtered table, or a match count. Column resolution is fully deferred:
//! a query stores no table reference and touches no column until it is
//! evaluated.

// Core module with error definitions
pub mod core;

// Typed column storage
pub mod column;

// Tabular container backends
pub mod table;

// Vectorized expression engine
pub mod expr;

// Query composition and evaluation
pub mod query;

pub use self::core::error::{Error, Result};

pub use column::{BooleanColumn, Column, ColumnType, Float64Column, Int64Column, StringColumn};

pub use table::{DataFrame, RecordArray, Table, Tabular, Value};

pub use expr::{EvalContext, LiteralValue};

pub use query::{maker, ColumnFn, Combinator, Predicate, Query};
