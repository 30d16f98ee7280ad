//! The Query value type

use std::collections::BTreeSet;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::sync::Arc;

use super::predicate::{Combinator, Predicate};
use crate::column::Column;
use crate::core::error::Result;
use crate::expr::engine::DEFAULT_CONTEXT;
use crate::expr::evaluator::EvalContext;
use crate::table::Tabular;

/// An immutable, composable boolean predicate over tabular data.
///
/// A query holds no table reference: the same query can be evaluated
/// against any number of different tables, of any [`Tabular`] shape.
/// Queries combine with `&`, `|`, `^` and invert with `!`, each operation
/// producing a new query and leaving its operands untouched.
///
/// # Examples
///
/// ```
/// use tablequery::{Float64Column, Int64Column, Query, Table};
///
/// let mut t = Table::new();
/// t.insert("a", Int64Column::new(vec![1, 1, 3, 5])).unwrap();
/// t.insert("b", Int64Column::new(vec![5, 1, 2, 5])).unwrap();
/// t.insert("c", Float64Column::new(vec![4.5, 6.2, 0.5, -3.5])).unwrap();
///
/// let q = Query::expr("a > 3");
/// assert_eq!(q.mask(&t).unwrap(), vec![false, false, false, true]);
/// assert_eq!(q.count(&t).unwrap(), 1);
///
/// let q2 = !Query::expr("a > 3") & Query::expr("b > c");
/// assert_eq!(q2.count(&t).unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    root: Arc<Predicate>,
}

impl Query {
    /// The always-true query: `mask` is all-true, `filter` keeps every row
    pub fn new() -> Self {
        Self {
            root: Arc::new(Predicate::True),
        }
    }

    /// A query from a string expression.
    ///
    /// The text is stored verbatim; it is neither parsed nor checked
    /// against any column set until the query is evaluated, so a malformed
    /// expression or missing column surfaces on first use.
    pub fn expr(text: impl Into<String>) -> Self {
        Self {
            root: Arc::new(Predicate::Expr(text.into())),
        }
    }

    /// A query from a callable applied positionally to named columns.
    ///
    /// Fails with [`InvalidArgument`](crate::Error::InvalidArgument) if
    /// the name list is empty or contains an empty name.
    pub fn columns<F>(func: F, columns: &[&str]) -> Result<Self>
    where
        F: Fn(&[Column]) -> Result<Column> + Send + Sync + 'static,
    {
        let columns = columns.iter().map(|name| name.to_string()).collect();
        Ok(Self {
            root: Arc::new(Predicate::columns(func, columns)?),
        })
    }

    /// The conjunction of every query in `queries`; empty input yields the
    /// always-true query
    pub fn all(queries: impl IntoIterator<Item = Query>) -> Query {
        queries
            .into_iter()
            .reduce(|acc, q| acc.and(&q))
            .unwrap_or_default()
    }

    /// The disjunction of every query in `queries`; empty input yields the
    /// always-true query
    pub fn any(queries: impl IntoIterator<Item = Query>) -> Query {
        queries
            .into_iter()
            .reduce(|acc, q| acc.or(&q))
            .unwrap_or_default()
    }

    /// Boolean mask over `table`, one entry per row
    pub fn mask<T: Tabular>(&self, table: &T) -> Result<Vec<bool>> {
        self.mask_with(table, &DEFAULT_CONTEXT)
    }

    /// `mask` with an explicit evaluation context
    pub fn mask_with<T: Tabular>(&self, table: &T, context: &EvalContext) -> Result<Vec<bool>> {
        self.root.mask(table, context)
    }

    /// A new table holding only the rows this query matches, in their
    /// original order
    pub fn filter<T: Tabular>(&self, table: &T) -> Result<T> {
        self.filter_with(table, &DEFAULT_CONTEXT)
    }

    /// `filter` with an explicit evaluation context
    pub fn filter_with<T: Tabular>(&self, table: &T, context: &EvalContext) -> Result<T> {
        self.root.filter(table, context)
    }

    /// Number of rows this query matches
    pub fn count<T: Tabular>(&self, table: &T) -> Result<usize> {
        self.count_with(table, &DEFAULT_CONTEXT)
    }

    /// `count` with an explicit evaluation context
    pub fn count_with<T: Tabular>(&self, table: &T, context: &EvalContext) -> Result<usize> {
        if matches!(*self.root, Predicate::True) {
            return Ok(table.nrows());
        }
        Ok(self
            .mask_with(table, context)?
            .into_iter()
            .filter(|&m| m)
            .count())
    }

    /// Conjunction of this query and `other`
    pub fn and(&self, other: &Query) -> Query {
        Query {
            root: Arc::new(Predicate::combine(Combinator::And, &self.root, &other.root)),
        }
    }

    /// Disjunction of this query and `other`
    pub fn or(&self, other: &Query) -> Query {
        Query {
            root: Arc::new(Predicate::combine(Combinator::Or, &self.root, &other.root)),
        }
    }

    /// Exclusive disjunction of this query and `other`
    pub fn xor(&self, other: &Query) -> Query {
        Query {
            root: Arc::new(Predicate::combine(Combinator::Xor, &self.root, &other.root)),
        }
    }

    /// Negation of this query. Negating a negation unwraps it.
    pub fn negate(&self) -> Query {
        match &*self.root {
            Predicate::Not(inner) => Query {
                root: inner.clone(),
            },
            _ => Query {
                root: Arc::new(Predicate::Not(self.root.clone())),
            },
        }
    }

    /// Names of every column this query references.
    ///
    /// Expression leaves are parsed on demand, so this can fail the same
    /// way evaluation would.
    pub fn referenced_columns(&self) -> Result<BTreeSet<String>> {
        self.root.referenced_columns()
    }

    /// The root predicate node
    pub fn predicate(&self) -> &Predicate {
        &self.root
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::expr(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::expr(text)
    }
}

impl BitAnd for Query {
    type Output = Query;

    fn bitand(self, rhs: Query) -> Query {
        self.and(&rhs)
    }
}

impl BitAnd for &Query {
    type Output = Query;

    fn bitand(self, rhs: &Query) -> Query {
        self.and(rhs)
    }
}

impl BitAnd<&Query> for Query {
    type Output = Query;

    fn bitand(self, rhs: &Query) -> Query {
        self.and(rhs)
    }
}

impl BitAnd<Query> for &Query {
    type Output = Query;

    fn bitand(self, rhs: Query) -> Query {
        self.and(&rhs)
    }
}

impl BitOr for Query {
    type Output = Query;

    fn bitor(self, rhs: Query) -> Query {
        self.or(&rhs)
    }
}

impl BitOr for &Query {
    type Output = Query;

    fn bitor(self, rhs: &Query) -> Query {
        self.or(rhs)
    }
}

impl BitXor for Query {
    type Output = Query;

    fn bitxor(self, rhs: Query) -> Query {
        self.xor(&rhs)
    }
}

impl BitXor for &Query {
    type Output = Query;

    fn bitxor(self, rhs: &Query) -> Query {
        self.xor(rhs)
    }
}

impl Not for Query {
    type Output = Query;

    fn not(self) -> Query {
        self.negate()
    }
}

impl Not for &Query {
    type Output = Query;

    fn not(self) -> Query {
        self.negate()
    }
}
