//! Predicate node trees
//!
//! A predicate is an immutable tree of leaves (string expressions or
//! callables over named columns) joined by boolean combinators. Trees are
//! never mutated after construction: combining predicates builds a new
//! node over reference-counted children, so subtrees are freely shared
//! between queries and may be resolved concurrently against different
//! tables.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::trace;

use crate::column::Column;
use crate::core::error::{Error, Result};
use crate::expr::engine;
use crate::expr::evaluator::EvalContext;
use crate::table::Tabular;

/// Callable applied positionally to named columns
pub type ColumnFn = Arc<dyn Fn(&[Column]) -> Result<Column> + Send + Sync>;

/// Boolean operator joining two or more child predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
    Xor,
}

/// A single node in a predicate tree
#[derive(Clone)]
pub enum Predicate {
    /// Matches every row
    True,
    /// String expression, kept verbatim until evaluation
    Expr(String),
    /// Callable over named columns, invoked positionally
    Columns {
        func: ColumnFn,
        columns: Vec<String>,
    },
    /// Element-wise reduction over child predicates, left to right
    Combine(Combinator, Vec<Arc<Predicate>>),
    /// Inversion of exactly one child
    Not(Arc<Predicate>),
}

impl Predicate {
    /// Build a callable leaf.
    ///
    /// Only the shape is validated here: the name list must be non-empty
    /// and every name a non-empty string. Whether the columns exist is
    /// discovered at evaluation time.
    pub fn columns<F>(func: F, columns: Vec<String>) -> Result<Self>
    where
        F: Fn(&[Column]) -> Result<Column> + Send + Sync + 'static,
    {
        if columns.is_empty() {
            return Err(Error::InvalidArgument(
                "a callable predicate requires at least one column name".to_string(),
            ));
        }
        if columns.iter().any(|name| name.is_empty()) {
            return Err(Error::InvalidArgument(
                "column names must be non-empty".to_string(),
            ));
        }
        Ok(Predicate::Columns {
            func: Arc::new(func),
            columns,
        })
    }

    /// Combine two nodes under `op`, flattening operands that already use
    /// the same operator
    pub(crate) fn combine(op: Combinator, left: &Arc<Predicate>, right: &Arc<Predicate>) -> Self {
        let mut operands = Vec::new();
        match (&**left, &**right) {
            (Predicate::Combine(lop, lhs), Predicate::Combine(rop, rhs))
                if *lop == op && *rop == op =>
            {
                operands.extend(lhs.iter().cloned());
                operands.extend(rhs.iter().cloned());
            }
            (Predicate::Combine(lop, lhs), _) if *lop == op => {
                operands.extend(lhs.iter().cloned());
                operands.push(right.clone());
            }
            (_, Predicate::Combine(rop, rhs)) if *rop == op => {
                operands.push(left.clone());
                operands.extend(rhs.iter().cloned());
            }
            _ => {
                operands.push(left.clone());
                operands.push(right.clone());
            }
        }
        Predicate::Combine(op, operands)
    }

    /// Resolve this node to a boolean mask over `table`
    pub fn mask<T: Tabular>(&self, table: &T, context: &EvalContext) -> Result<Vec<bool>> {
        match self {
            Predicate::True => Ok(vec![true; table.nrows()]),

            Predicate::Expr(text) => {
                let column = engine::evaluate_against(text, table, context)?;
                match column {
                    Column::Boolean(mask) => Ok(mask.to_vec()),
                    other => Err(Error::InvalidResultType(format!(
                        "expression `{}` produced a {:?} column, expected Boolean",
                        text,
                        other.column_type()
                    ))),
                }
            }

            Predicate::Columns { func, columns } => {
                let fetched = columns
                    .iter()
                    .map(|name| table.column(name))
                    .collect::<Result<Vec<_>>>()?;
                let result = func(&fetched)?;
                let mask = match result {
                    Column::Boolean(mask) => mask.to_vec(),
                    other => {
                        return Err(Error::InvalidResultType(format!(
                            "callable over {:?} produced a {:?} column, expected Boolean",
                            columns,
                            other.column_type()
                        )))
                    }
                };
                if mask.len() != table.nrows() {
                    return Err(Error::ResultLengthMismatch {
                        expected: table.nrows(),
                        found: mask.len(),
                    });
                }
                Ok(mask)
            }

            Predicate::Combine(op, operands) => {
                let (first, rest) = operands.split_first().ok_or_else(|| {
                    Error::InvalidArgument("a combinator requires at least one operand".to_string())
                })?;
                trace!("reducing {} child masks with {:?}", operands.len(), op);
                let mut acc = first.mask(table, context)?;
                for operand in rest {
                    let next = operand.mask(table, context)?;
                    for (slot, value) in acc.iter_mut().zip(next) {
                        *slot = match op {
                            Combinator::And => *slot && value,
                            Combinator::Or => *slot || value,
                            Combinator::Xor => *slot != value,
                        };
                    }
                }
                Ok(acc)
            }

            Predicate::Not(inner) => {
                let mut mask = inner.mask(table, context)?;
                for slot in mask.iter_mut() {
                    *slot = !*slot;
                }
                Ok(mask)
            }
        }
    }

    /// Filter `table` down to the rows this node matches.
    ///
    /// An AND combinator refines progressively: each child filters the
    /// survivors of the previous one, so later children evaluate over
    /// ever-smaller tables.
    pub fn filter<T: Tabular>(&self, table: &T, context: &EvalContext) -> Result<T> {
        match self {
            Predicate::True => Ok(table.clone()),
            Predicate::Combine(Combinator::And, operands) => {
                let mut current = table.clone();
                for operand in operands {
                    current = operand.filter(&current, context)?;
                }
                Ok(current)
            }
            _ => table.select(&self.mask(table, context)?),
        }
    }

    /// Names of every column this node references.
    ///
    /// Expression leaves are parsed on demand, so a malformed expression
    /// fails here the same way it would at evaluation.
    pub fn referenced_columns(&self) -> Result<std::collections::BTreeSet<String>> {
        let mut out = std::collections::BTreeSet::new();
        self.collect_columns(&mut out)?;
        Ok(out)
    }

    fn collect_columns(&self, out: &mut std::collections::BTreeSet<String>) -> Result<()> {
        match self {
            Predicate::True => {}
            Predicate::Expr(text) => {
                let ast = engine::parse(text).map_err(|e| Error::Expression {
                    expr: text.clone(),
                    message: e.to_string(),
                })?;
                out.extend(ast.column_refs());
            }
            Predicate::Columns { columns, .. } => out.extend(columns.iter().cloned()),
            Predicate::Combine(_, operands) => {
                for operand in operands {
                    operand.collect_columns(out)?;
                }
            }
            Predicate::Not(inner) => inner.collect_columns(out)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("True"),
            Predicate::Expr(text) => f.debug_tuple("Expr").field(text).finish(),
            Predicate::Columns { columns, .. } => f
                .debug_struct("Columns")
                .field("columns", columns)
                .field("func", &"<fn>")
                .finish(),
            Predicate::Combine(op, operands) => {
                f.debug_tuple("Combine").field(op).field(operands).finish()
            }
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Predicate::True, Predicate::True) => true,
            (Predicate::Expr(a), Predicate::Expr(b)) => a == b,
            (
                Predicate::Columns {
                    func: fa,
                    columns: ca,
                },
                Predicate::Columns {
                    func: fb,
                    columns: cb,
                },
            ) => {
                // closures have no structural identity; equal means shared
                std::ptr::eq(
                    Arc::as_ptr(fa) as *const (),
                    Arc::as_ptr(fb) as *const (),
                ) && ca == cb
            }
            (Predicate::Combine(aop, aops), Predicate::Combine(bop, bops)) => {
                aop == bop && aops == bops
            }
            (Predicate::Not(a), Predicate::Not(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Predicate::True => {}
            Predicate::Expr(text) => text.hash(state),
            Predicate::Columns { func, columns } => {
                (Arc::as_ptr(func) as *const () as usize).hash(state);
                columns.hash(state);
            }
            Predicate::Combine(op, operands) => {
                op.hash(state);
                operands.hash(state);
            }
            Predicate::Not(inner) => inner.hash(state),
        }
    }
}
