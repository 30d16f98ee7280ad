//! Binding between expression text and tabular containers
//!
//! Nothing about an expression is parsed or validated until it is
//! evaluated against a concrete table. At that point the parsed AST's
//! identifier set drives column resolution, so only the columns an
//! expression actually references are fetched — unrelated columns can be
//! absent or malformed without consequence.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::{debug, trace};

use super::ast::Expr;
use super::evaluator::{EvalContext, Evaluator};
use super::lexer_parser::{Lexer, Parser};
use crate::column::Column;
use crate::core::error::{Error, Result};
use crate::table::Tabular;

lazy_static! {
    /// Context used when the caller does not supply one
    pub(crate) static ref DEFAULT_CONTEXT: EvalContext = EvalContext::new();
}

/// Parse expression text into an AST
pub fn parse(expr: &str) -> Result<Expr> {
    let tokens = Lexer::tokenize(expr)?;
    Parser::new(tokens).parse()
}

/// Evaluate `expr` against `table`.
///
/// Returns whatever column the expression produces; callers that need a
/// boolean mask enforce that themselves. Parse and evaluation failures are
/// wrapped as [`Error::Expression`] carrying the original text; a missing
/// referenced column surfaces as [`Error::ColumnNotFound`].
pub fn evaluate_against<T: Tabular>(
    expr: &str,
    table: &T,
    context: &EvalContext,
) -> Result<Column> {
    let ast = parse(expr).map_err(|e| Error::Expression {
        expr: expr.to_string(),
        message: e.to_string(),
    })?;

    let mut namespace = HashMap::new();
    for name in ast.column_refs() {
        if context.is_variable(&name) {
            continue;
        }
        trace!("resolving column `{}` for expression `{}`", name, expr);
        namespace.insert(name.clone(), table.column(&name)?);
    }

    debug!("evaluating `{}` over {} rows", expr, table.nrows());
    let evaluator = Evaluator::new(&namespace, context, table.nrows());
    evaluator.evaluate(&ast).map_err(|e| match e {
        e @ Error::ColumnNotFound(_) => e,
        other => Error::Expression {
            expr: expr.to_string(),
            message: other.to_string(),
        },
    })
}
