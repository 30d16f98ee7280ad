//! Vectorized expression evaluation
//!
//! Expressions are evaluated one whole column at a time rather than row by
//! row: every operation maps over entire value vectors, literals broadcast
//! to the table's row count, and Int64 operands are promoted to Float64 in
//! numeric contexts. Large numeric kernels switch to rayon when the
//! context allows it.

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;

use super::ast::{BinaryOp, Expr, LiteralValue, UnaryOp};
use crate::column::{BooleanColumn, Column, Float64Column, StringColumn};
use crate::core::error::{Error, Result};

/// Row count above which numeric kernels run on rayon
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// Evaluation context: registered functions, scalar variable bindings, and
/// parallelism settings
pub struct EvalContext {
    /// Variable bindings for substitution
    variables: HashMap<String, LiteralValue>,
    /// Available element-wise functions
    functions: HashMap<String, Box<dyn Fn(&[f64]) -> f64 + Send + Sync>>,
    /// Enable rayon kernels
    parallel_enabled: bool,
    /// Row-count threshold for rayon kernels
    parallel_threshold: usize,
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("variables", &self.variables)
            .field("functions", &format!("{} functions", self.functions.len()))
            .field("parallel_enabled", &self.parallel_enabled)
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        let mut context = Self {
            variables: HashMap::new(),
            functions: HashMap::new(),
            parallel_enabled: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        };
        context.add_builtin_functions();
        context
    }
}

impl EvalContext {
    /// Create a new evaluation context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with explicit parallelism settings
    pub fn with_parallel_settings(parallel_enabled: bool, parallel_threshold: usize) -> Self {
        let mut context = Self::default();
        context.parallel_enabled = parallel_enabled;
        context.parallel_threshold = parallel_threshold;
        context
    }

    /// Add a variable binding
    pub fn set_variable(&mut self, name: String, value: LiteralValue) {
        self.variables.insert(name, value);
    }

    /// Look up a variable binding
    pub fn variable(&self, name: &str) -> Option<&LiteralValue> {
        self.variables.get(name)
    }

    /// Check whether a name is bound as a variable
    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Add a custom element-wise function
    pub fn add_function<F>(&mut self, name: String, func: F)
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.functions.insert(name, Box::new(func));
    }

    fn parallel(&self, len: usize) -> bool {
        self.parallel_enabled && len >= self.parallel_threshold
    }

    /// Add built-in mathematical functions
    fn add_builtin_functions(&mut self) {
        self.add_function("abs".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].abs()
            }
        });

        self.add_function("sqrt".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].sqrt()
            }
        });

        self.add_function("log".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].ln()
            }
        });

        self.add_function("log10".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].log10()
            }
        });

        self.add_function("exp".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].exp()
            }
        });

        self.add_function("sin".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].sin()
            }
        });

        self.add_function("cos".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].cos()
            }
        });

        self.add_function("tan".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].tan()
            }
        });

        self.add_function("floor".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].floor()
            }
        });

        self.add_function("ceil".to_string(), |args| {
            if args.is_empty() {
                0.0
            } else {
                args[0].ceil()
            }
        });

        self.add_function("min".to_string(), |args| {
            args.iter().fold(f64::INFINITY, |a, &b| a.min(b))
        });

        self.add_function("max".to_string(), |args| {
            args.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        });
    }
}

/// Intermediate whole-column value produced during evaluation
enum Values {
    Numbers(Vec<f64>),
    Strings(Vec<String>),
    Bools(Vec<bool>),
}

impl Values {
    fn kind(&self) -> &'static str {
        match self {
            Values::Numbers(_) => "numeric",
            Values::Strings(_) => "string",
            Values::Bools(_) => "boolean",
        }
    }

    fn into_numbers(self) -> Result<Vec<f64>> {
        match self {
            Values::Numbers(v) => Ok(v),
            other => Err(Error::Cast(format!(
                "expected a numeric operand, found {}",
                other.kind()
            ))),
        }
    }

    fn into_bools(self) -> Result<Vec<bool>> {
        match self {
            Values::Bools(v) => Ok(v),
            other => Err(Error::Cast(format!(
                "expected a boolean operand, found {}",
                other.kind()
            ))),
        }
    }
}

/// Expression evaluator over a namespace of named columns
pub struct Evaluator<'a> {
    namespace: &'a HashMap<String, Column>,
    context: &'a EvalContext,
    rows: usize,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator
    pub fn new(namespace: &'a HashMap<String, Column>, context: &'a EvalContext, rows: usize) -> Self {
        Self {
            namespace,
            context,
            rows,
        }
    }

    /// Evaluate an expression into a column of `rows` entries
    pub fn evaluate(&self, expr: &Expr) -> Result<Column> {
        Ok(match self.eval(expr)? {
            Values::Numbers(v) => Column::Float64(Float64Column::new(v)),
            Values::Strings(v) => Column::String(StringColumn::new(v)),
            Values::Bools(v) => Column::Boolean(BooleanColumn::new(v)),
        })
    }

    fn eval(&self, expr: &Expr) -> Result<Values> {
        match expr {
            Expr::Column(name) => self.eval_identifier(name),
            Expr::Literal(lit) => Ok(self.broadcast(lit)),
            Expr::Binary { left, op, right } => self.eval_binary(left, *op, right),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Function { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_identifier(&self, name: &str) -> Result<Values> {
        if let Some(column) = self.namespace.get(name) {
            return Ok(match column {
                Column::Int64(col) => Values::Numbers(col.to_f64()),
                Column::Float64(col) => Values::Numbers(col.values().to_vec()),
                Column::String(col) => Values::Strings(col.values().to_vec()),
                Column::Boolean(col) => Values::Bools(col.values().to_vec()),
            });
        }
        if let Some(value) = self.context.variable(name) {
            return Ok(self.broadcast(value));
        }
        Err(Error::ColumnNotFound(name.to_string()))
    }

    fn broadcast(&self, lit: &LiteralValue) -> Values {
        match lit {
            LiteralValue::Number(v) => Values::Numbers(vec![*v; self.rows]),
            LiteralValue::String(s) => Values::Strings(vec![s.clone(); self.rows]),
            LiteralValue::Boolean(b) => Values::Bools(vec![*b; self.rows]),
        }
    }

    fn eval_binary(&self, left: &Expr, op: BinaryOp, right: &Expr) -> Result<Values> {
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;
        match op {
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo
            | BinaryOp::Power => self.eval_arithmetic(lhs, op, rhs),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessThanOrEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterThanOrEqual => self.eval_comparison(lhs, op, rhs),
            BinaryOp::And | BinaryOp::Or => self.eval_logical(lhs, op, rhs),
        }
    }

    fn eval_arithmetic(&self, lhs: Values, op: BinaryOp, rhs: Values) -> Result<Values> {
        let a = lhs.into_numbers()?;
        let b = rhs.into_numbers()?;
        let apply = move |x: f64, y: f64| -> f64 {
            match op {
                BinaryOp::Add => x + y,
                BinaryOp::Subtract => x - y,
                BinaryOp::Multiply => x * y,
                BinaryOp::Divide => x / y,
                BinaryOp::Modulo => x % y,
                BinaryOp::Power => x.powf(y),
                _ => unreachable!(),
            }
        };
        Ok(Values::Numbers(self.zip_f64(&a, &b, apply)))
    }

    fn eval_comparison(&self, lhs: Values, op: BinaryOp, rhs: Values) -> Result<Values> {
        match (lhs, rhs) {
            (Values::Numbers(a), Values::Numbers(b)) => {
                let apply = move |x: f64, y: f64| -> bool {
                    match op {
                        BinaryOp::Equal => x == y,
                        BinaryOp::NotEqual => x != y,
                        BinaryOp::LessThan => x < y,
                        BinaryOp::LessThanOrEqual => x <= y,
                        BinaryOp::GreaterThan => x > y,
                        BinaryOp::GreaterThanOrEqual => x >= y,
                        _ => unreachable!(),
                    }
                };
                Ok(Values::Bools(self.zip_f64(&a, &b, apply)))
            }
            (Values::Strings(a), Values::Strings(b)) => {
                let out = a
                    .iter()
                    .zip(&b)
                    .map(|(x, y)| match op {
                        BinaryOp::Equal => x == y,
                        BinaryOp::NotEqual => x != y,
                        BinaryOp::LessThan => x < y,
                        BinaryOp::LessThanOrEqual => x <= y,
                        BinaryOp::GreaterThan => x > y,
                        BinaryOp::GreaterThanOrEqual => x >= y,
                        _ => unreachable!(),
                    })
                    .collect();
                Ok(Values::Bools(out))
            }
            (Values::Bools(a), Values::Bools(b)) => match op {
                BinaryOp::Equal => Ok(Values::Bools(
                    a.iter().zip(&b).map(|(x, y)| x == y).collect(),
                )),
                BinaryOp::NotEqual => Ok(Values::Bools(
                    a.iter().zip(&b).map(|(x, y)| x != y).collect(),
                )),
                _ => Err(Error::Cast(
                    "boolean operands support only == and != comparisons".to_string(),
                )),
            },
            (lhs, rhs) => Err(Error::Cast(format!(
                "cannot compare {} and {} operands",
                lhs.kind(),
                rhs.kind()
            ))),
        }
    }

    fn eval_logical(&self, lhs: Values, op: BinaryOp, rhs: Values) -> Result<Values> {
        let a = lhs.into_bools()?;
        let b = rhs.into_bools()?;
        let out = a
            .iter()
            .zip(&b)
            .map(|(&x, &y)| match op {
                BinaryOp::And => x && y,
                BinaryOp::Or => x || y,
                _ => unreachable!(),
            })
            .collect();
        Ok(Values::Bools(out))
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Values> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Not => {
                let v = value.into_bools()?;
                Ok(Values::Bools(v.iter().map(|&b| !b).collect()))
            }
            UnaryOp::Negate => {
                let v = value.into_numbers()?;
                Ok(Values::Numbers(v.iter().map(|&x| -x).collect()))
            }
        }
    }

    fn eval_function(&self, name: &str, args: &[Expr]) -> Result<Values> {
        let func = self
            .context
            .functions
            .get(name)
            .ok_or_else(|| Error::InvalidValue(format!("Unknown function: {}", name)))?;
        if args.is_empty() {
            return Err(Error::InvalidValue(format!(
                "Function {} requires at least one argument",
                name
            )));
        }

        let columns = args
            .iter()
            .map(|arg| self.eval(arg)?.into_numbers())
            .collect::<Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(self.rows);
        let mut buffer = vec![0.0; columns.len()];
        for row in 0..self.rows {
            for (slot, column) in buffer.iter_mut().zip(&columns) {
                *slot = column[row];
            }
            out.push(func(&buffer));
        }
        Ok(Values::Numbers(out))
    }

    fn zip_f64<R, F>(&self, a: &[f64], b: &[f64], apply: F) -> Vec<R>
    where
        R: Send,
        F: Fn(f64, f64) -> R + Send + Sync,
    {
        if self.context.parallel(a.len()) {
            a.par_iter()
                .zip(b.par_iter())
                .map(|(&x, &y)| apply(x, y))
                .collect()
        } else {
            a.iter().zip(b).map(|(&x, &y)| apply(x, y)).collect()
        }
    }
}
