//! Predicate factory library
//!
//! Convenience constructors for common predicates. Every factory returns
//! an ordinary [`Query`] built from the string-expression or callable
//! machinery — there is no separate evaluation path. Factories that embed
//! the column name into an expression validate it is an identifier;
//! callable-based factories defer all column checks to evaluation, like
//! any other query.

use std::ops::{Bound, RangeBounds};

use regex::Regex;

use super::base::Query;
use crate::column::{BooleanColumn, Column, ColumnType};
use crate::core::error::{Error, Result};
use crate::expr::LiteralValue;

/// Rows where `column` equals `value`
pub fn equals(column: &str, value: impl Into<LiteralValue>) -> Result<Query> {
    check_column(column)?;
    Ok(Query::expr(format!(
        "{} == {}",
        column,
        render(&value.into())
    )))
}

/// Rows where `column` differs from `value`
pub fn not_equals(column: &str, value: impl Into<LiteralValue>) -> Result<Query> {
    check_column(column)?;
    Ok(Query::expr(format!(
        "{} != {}",
        column,
        render(&value.into())
    )))
}

/// Rows where `column` is one of `values`; an empty collection matches
/// nothing
pub fn is_in<V>(column: &str, values: impl IntoIterator<Item = V>) -> Result<Query>
where
    V: Into<LiteralValue>,
{
    check_column(column)?;
    let clauses: Vec<String> = values
        .into_iter()
        .map(|value| format!("{} == {}", column, render(&value.into())))
        .collect();
    if clauses.is_empty() {
        return Ok(Query::expr("false"));
    }
    Ok(Query::expr(clauses.join(" || ")))
}

/// Rows where `column` falls within `range`.
///
/// Any [`RangeBounds<f64>`] works, so inclusive and exclusive bounds are
/// picked at the call site: `in_range("a", 1.0..=5.0)`,
/// `in_range("a", 2.5..)`. A fully unbounded range matches every row.
pub fn in_range(column: &str, range: impl RangeBounds<f64>) -> Result<Query> {
    check_column(column)?;
    let mut clauses = Vec::new();
    match range.start_bound() {
        Bound::Included(lo) => clauses.push(format!("{} >= {}", column, lo)),
        Bound::Excluded(lo) => clauses.push(format!("{} > {}", column, lo)),
        Bound::Unbounded => {}
    }
    match range.end_bound() {
        Bound::Included(hi) => clauses.push(format!("{} <= {}", column, hi)),
        Bound::Excluded(hi) => clauses.push(format!("{} < {}", column, hi)),
        Bound::Unbounded => {}
    }
    if clauses.is_empty() {
        return Ok(Query::new());
    }
    Ok(Query::expr(clauses.join(" && ")))
}

/// Rows whose string `column` contains `needle`
pub fn contains(column: &str, needle: impl Into<String>) -> Result<Query> {
    let needle = needle.into();
    string_predicate(column, move |value| value.contains(&needle))
}

/// Rows whose string `column` starts with `prefix`
pub fn starts_with(column: &str, prefix: impl Into<String>) -> Result<Query> {
    let prefix = prefix.into();
    string_predicate(column, move |value| value.starts_with(&prefix))
}

/// Rows whose string `column` ends with `suffix`
pub fn ends_with(column: &str, suffix: impl Into<String>) -> Result<Query> {
    let suffix = suffix.into();
    string_predicate(column, move |value| value.ends_with(&suffix))
}

/// Rows whose string `column` matches `pattern`.
///
/// The pattern is compiled eagerly, so an invalid pattern fails here
/// rather than at evaluation.
pub fn matches(column: &str, pattern: &str) -> Result<Query> {
    let re = Regex::new(pattern)?;
    string_predicate(column, move |value| re.is_match(value))
}

fn string_predicate<F>(column: &str, test: F) -> Result<Query>
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let name = column.to_string();
    Query::columns(
        move |cols: &[Column]| {
            let first = cols.first().ok_or_else(|| {
                Error::InvalidArgument("string predicate expects one column".to_string())
            })?;
            match first {
                Column::String(values) => Ok(Column::Boolean(BooleanColumn::new(
                    values.values().iter().map(|value| test(value)).collect(),
                ))),
                other => Err(Error::ColumnTypeMismatch {
                    name: name.clone(),
                    expected: ColumnType::String,
                    found: other.column_type(),
                }),
            }
        },
        &[column],
    )
}

fn check_column(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "`{}` is not a valid column identifier",
            name
        )))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn render(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Number(v) => format!("{}", v),
        LiteralValue::String(s) => {
            format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
        }
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("col_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2col"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn test_render_quotes_strings() {
        assert_eq!(render(&LiteralValue::String("it's".to_string())), "'it\\'s'");
        assert_eq!(render(&LiteralValue::Number(3.0)), "3");
        assert_eq!(render(&LiteralValue::Boolean(true)), "true");
    }
}
