//! The typed numeric container every operation consumes.

use indexmap::IndexMap;
use ndarray::{ArrayD, IxDyn};
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Normalized input: a dense N-D float array or an ordered columnar table.
#[derive(Debug, Clone)]
pub enum NumericContainer {
    Array(ArrayD<f64>),
    Table(Table),
}

/// One table column. Reductions only consume numeric columns; anything else
/// is carried through untouched and skipped.
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Vec<f64>),
    Other(Vec<Value>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Other(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered columns of equal length. Column order is first-seen key order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: IndexMap<String, Column>,
}

impl Table {
    pub fn new(columns: IndexMap<String, Column>) -> Self {
        Self { columns }
    }

    pub fn rows(&self) -> usize {
        self.columns.values().next().map(Column::len).unwrap_or(0)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().filter_map(|(name, col)| match col {
            Column::Numeric(values) => Some((name.as_str(), values.as_slice())),
            Column::Other(_) => None,
        })
    }
}

impl NumericContainer {
    pub fn is_empty(&self) -> bool {
        match self {
            NumericContainer::Array(arr) => arr.is_empty(),
            NumericContainer::Table(table) => table.rows() == 0,
        }
    }

    /// Extract a plain array. A table qualifies only when it has exactly one
    /// numeric column; anything else has no unambiguous array form.
    pub fn into_array(self, context: &str) -> Result<ArrayD<f64>> {
        match self {
            NumericContainer::Array(arr) => Ok(arr),
            NumericContainer::Table(table) => {
                let mut numeric = table.numeric_columns();
                match (numeric.next(), numeric.next()) {
                    (Some((_, values)), None) => {
                        Ok(ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec())
                            .map_err(|e| EngineError::Shape(e.to_string()))?)
                    }
                    _ => Err(EngineError::Shape(format!(
                        "{} requires array input or a table with a single numeric column",
                        context
                    ))),
                }
            }
        }
    }
}
