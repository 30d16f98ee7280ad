//! Row-oriented record storage

use serde::{Deserialize, Serialize};

use super::Tabular;
use crate::column::{BooleanColumn, Column, Float64Column, Int64Column, StringColumn};
use crate::core::error::{Error, Result};

/// A single cell value inside a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Row-oriented collection of records sharing one field schema.
///
/// Columns do not exist in storage; [`Tabular::column`] assembles one on
/// demand from the cells of every record. A field whose cells mix int and
/// float values is promoted to Float64; any other mixture is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordArray {
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordArray {
    /// Create an empty record array with the given field schema
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Create a record array from a schema and rows
    pub fn from_rows(fields: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut out = Self::new(fields);
        for row in rows {
            out.push(row)?;
        }
        Ok(out)
    }

    /// Build a record array from a JSON array of objects.
    ///
    /// Every object must carry the same set of keys; fields are ordered by
    /// key. Nested arrays, objects, and nulls are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)?;
        let Some(first) = parsed.first() else {
            return Ok(Self::new(Vec::new()));
        };
        let fields: Vec<String> = first.keys().cloned().collect();
        let mut out = Self::new(fields.clone());
        for object in &parsed {
            if object.len() != fields.len() {
                return Err(Error::InvalidValue(
                    "all records must share the same keys".to_string(),
                ));
            }
            let mut row = Vec::with_capacity(fields.len());
            for field in &fields {
                let value = object.get(field).ok_or_else(|| {
                    Error::InvalidValue(format!("record is missing key `{}`", field))
                })?;
                row.push(json_to_value(field, value)?);
            }
            out.push(row)?;
        }
        Ok(out)
    }

    /// Append one record; its arity must match the schema
    pub fn push(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.fields.len() {
            return Err(Error::LengthMismatch {
                expected: self.fields.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Field names, in schema order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Fetch a single cell
    pub fn get(&self, row: usize, field: &str) -> Result<&Value> {
        let idx = self.field_index(field)?;
        let record = self.rows.get(row).ok_or(Error::IndexOutOfBounds {
            index: row,
            size: self.rows.len(),
        })?;
        Ok(&record[idx])
    }

    fn field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}

fn json_to_value(field: &str, value: &serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(Error::InvalidValue(format!(
                    "number in field `{}` is out of range",
                    field
                )))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        other => Err(Error::InvalidValue(format!(
            "field `{}` holds an unsupported JSON value: {}",
            field, other
        ))),
    }
}

impl Tabular for RecordArray {
    fn nrows(&self) -> usize {
        self.rows.len()
    }

    fn column_names(&self) -> &[String] {
        &self.fields
    }

    fn column(&self, name: &str) -> Result<Column> {
        let idx = self.field_index(name)?;
        let mut has_int = false;
        let mut has_float = false;
        let mut has_str = false;
        let mut has_bool = false;
        for row in &self.rows {
            match &row[idx] {
                Value::Int(_) => has_int = true,
                Value::Float(_) => has_float = true,
                Value::Str(_) => has_str = true,
                Value::Bool(_) => has_bool = true,
            }
        }

        let numeric = has_int || has_float;
        if (numeric && (has_str || has_bool)) || (has_str && has_bool) {
            let kinds: Vec<&str> = self
                .rows
                .iter()
                .map(|row| row[idx].kind())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            return Err(Error::UnsupportedTableType(format!(
                "record array field `{}` mixes {} values",
                name,
                kinds.join(" and ")
            )));
        }

        let column = if has_str {
            let data = self
                .rows
                .iter()
                .map(|row| match &row[idx] {
                    Value::Str(s) => s.clone(),
                    _ => unreachable!(),
                })
                .collect();
            Column::String(StringColumn::with_name(data, name))
        } else if has_bool {
            let data = self
                .rows
                .iter()
                .map(|row| match &row[idx] {
                    Value::Bool(b) => *b,
                    _ => unreachable!(),
                })
                .collect();
            Column::Boolean(BooleanColumn::with_name(data, name))
        } else if has_float {
            let data = self
                .rows
                .iter()
                .map(|row| match &row[idx] {
                    Value::Float(f) => *f,
                    Value::Int(i) => *i as f64,
                    _ => unreachable!(),
                })
                .collect();
            Column::Float64(Float64Column::with_name(data, name))
        } else if has_int {
            let data = self
                .rows
                .iter()
                .map(|row| match &row[idx] {
                    Value::Int(i) => *i,
                    _ => unreachable!(),
                })
                .collect();
            Column::Int64(Int64Column::with_name(data, name))
        } else {
            // zero rows: the field has no observable type
            Column::Float64(Float64Column::with_name(Vec::new(), name))
        };
        Ok(column)
    }

    fn select(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.rows.len() {
            return Err(Error::LengthMismatch {
                expected: self.rows.len(),
                actual: mask.len(),
            });
        }
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter_map(|(row, &keep)| if keep { Some(row.clone()) } else { None })
            .collect();
        Ok(Self {
            fields: self.fields.clone(),
            rows,
        })
    }
}
