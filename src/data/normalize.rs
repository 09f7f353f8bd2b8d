//! Input Normalizer: raw JSON values into a `NumericContainer`.
//!
//! Three accepted shapes:
//! - a sequence of numbers, possibly nested, becomes a dense N-D array;
//! - a sequence of uniform-keyed records becomes a table whose columns are
//!   the union of keys in first-seen order;
//! - a single mapping of column name to list (or scalar) becomes a table
//!   directly.

use indexmap::IndexMap;
use ndarray::{ArrayD, IxDyn};
use serde_json::{Map, Value};

use crate::data::container::{Column, NumericContainer, Table};
use crate::error::{EngineError, Result};

pub fn normalize(raw: &Value) -> Result<NumericContainer> {
    match raw {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            if items.iter().all(Value::is_object) {
                Ok(NumericContainer::Table(table_from_records(items)?))
            } else {
                Ok(NumericContainer::Array(array_from_value(raw)?))
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            Ok(NumericContainer::Table(table_from_mapping(map)?))
        }
        other => Err(EngineError::Shape(format!(
            "unsupported input shape: expected a sequence or mapping, got {}",
            type_name(other)
        ))),
    }
}

/// Nested JSON number lists to a dense array. The shape is taken from the
/// first element at each depth; any deviation is a ragged input.
fn array_from_value(raw: &Value) -> Result<ArrayD<f64>> {
    let mut shape = Vec::new();
    let mut probe = raw;
    while let Value::Array(items) = probe {
        shape.push(items.len());
        match items.first() {
            Some(first) => probe = first,
            None => break,
        }
    }

    let mut flat = Vec::with_capacity(shape.iter().product());
    flatten(raw, &shape, 0, &mut flat)?;
    ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|e| EngineError::Shape(e.to_string()))
}

fn flatten(value: &Value, shape: &[usize], depth: usize, out: &mut Vec<f64>) -> Result<()> {
    match value {
        Value::Array(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err(EngineError::Shape("ragged nested array input".into()));
            }
            for item in items {
                flatten(item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        other => {
            if depth != shape.len() {
                return Err(EngineError::Shape("ragged nested array input".into()));
            }
            let num = as_number(other).ok_or_else(|| {
                EngineError::Shape(format!(
                    "non-numeric entry in array input: {}",
                    type_name(other)
                ))
            })?;
            out.push(num);
            Ok(())
        }
    }
}

fn table_from_records(records: &[Value]) -> Result<Table> {
    // Column order is first-seen key order across all records.
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !order.iter().any(|k| *k == key.as_str()) {
                    order.push(key.as_str());
                }
            }
        }
    }

    for (row, record) in records.iter().enumerate() {
        if let Value::Object(map) = record {
            for key in &order {
                if !map.contains_key(*key) {
                    return Err(EngineError::Shape(format!(
                        "ragged record set: record {} is missing key '{}'",
                        row, key
                    )));
                }
            }
        }
    }

    let mut columns = IndexMap::new();
    for key in order {
        let cells: Vec<&Value> = records
            .iter()
            .filter_map(|r| r.as_object().and_then(|m| m.get(key)))
            .collect();
        columns.insert(key.to_string(), column_from_cells(&cells));
    }
    Ok(Table::new(columns))
}

fn table_from_mapping(map: &Map<String, Value>) -> Result<Table> {
    let all_lists = map.values().all(Value::is_array);
    let all_scalars = map.values().all(|v| !v.is_array() && !v.is_object());

    if all_lists {
        let mut length = None;
        let mut columns = IndexMap::new();
        for (name, value) in map {
            let items = value.as_array().map(|a| a.as_slice()).unwrap_or(&[]);
            match length {
                None => length = Some(items.len()),
                Some(len) if len != items.len() => {
                    return Err(EngineError::Shape(format!(
                        "table columns have unequal lengths: '{}' has {} values, expected {}",
                        name,
                        items.len(),
                        len
                    )))
                }
                Some(_) => {}
            }
            let cells: Vec<&Value> = items.iter().collect();
            columns.insert(name.clone(), column_from_cells(&cells));
        }
        Ok(Table::new(columns))
    } else if all_scalars {
        // Mapping of name -> scalar becomes a one-row table.
        let mut columns = IndexMap::new();
        for (name, value) in map {
            columns.insert(name.clone(), column_from_cells(&[value]));
        }
        Ok(Table::new(columns))
    } else {
        Err(EngineError::Shape(
            "mapping input must be either all lists or all scalars".into(),
        ))
    }
}

fn column_from_cells(cells: &[&Value]) -> Column {
    let mut numeric = Vec::with_capacity(cells.len());
    for cell in cells {
        match as_number(cell) {
            Some(num) => numeric.push(num),
            None => return Column::Other(cells.iter().map(|v| (*v).clone()).collect()),
        }
    }
    Column::Numeric(numeric)
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_sequence_becomes_one_dimensional_array() {
        let container = normalize(&json!([1, 2.5, 3])).unwrap();
        match container {
            NumericContainer::Array(arr) => {
                assert_eq!(arr.shape(), &[3]);
                assert_eq!(arr.as_slice().unwrap(), &[1.0, 2.5, 3.0]);
            }
            _ => panic!("expected array container"),
        }
    }

    #[test]
    fn nested_sequence_becomes_matrix() {
        let container = normalize(&json!([[1, 2, 3], [4, 5, 6]])).unwrap();
        match container {
            NumericContainer::Array(arr) => assert_eq!(arr.shape(), &[2, 3]),
            _ => panic!("expected array container"),
        }
    }

    #[test]
    fn ragged_nesting_is_a_shape_error() {
        let err = normalize(&json!([[1, 2], [3]])).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
    }

    #[test]
    fn non_numeric_sequence_is_a_shape_error() {
        let err = normalize(&json!([1, "two", 3])).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
    }

    #[test]
    fn record_sequence_becomes_table_in_first_seen_order() {
        let container = normalize(&json!([
            { "b": 1, "a": 2 },
            { "b": 3, "a": 4 },
        ]))
        .unwrap();
        match container {
            NumericContainer::Table(table) => {
                let names: Vec<_> = table.columns().map(|(n, _)| n.to_string()).collect();
                assert_eq!(names, vec!["b", "a"]);
                assert_eq!(table.rows(), 2);
            }
            _ => panic!("expected table container"),
        }
    }

    #[test]
    fn ragged_records_are_rejected() {
        let err = normalize(&json!([{ "a": 1, "b": 2 }, { "a": 3 }])).unwrap_err();
        match err {
            EngineError::Shape(msg) => assert!(msg.contains("ragged record set")),
            other => panic!("expected shape error, got {:?}", other),
        }
    }

    #[test]
    fn mapping_of_lists_becomes_table() {
        let container = normalize(&json!({ "x": [1, 2], "y": [3, 4] })).unwrap();
        match container {
            NumericContainer::Table(table) => assert_eq!(table.rows(), 2),
            _ => panic!("expected table container"),
        }
    }

    #[test]
    fn mapping_of_scalars_becomes_one_row_table() {
        let container = normalize(&json!({ "x": 1, "y": "label" })).unwrap();
        match container {
            NumericContainer::Table(table) => {
                assert_eq!(table.rows(), 1);
                let numeric: Vec<_> = table.numeric_columns().map(|(n, _)| n).collect();
                assert_eq!(numeric, vec!["x"]);
            }
            _ => panic!("expected table container"),
        }
    }

    #[test]
    fn unequal_column_lengths_are_rejected() {
        let err = normalize(&json!({ "x": [1, 2], "y": [3] })).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
    }

    #[test]
    fn scalar_input_is_rejected() {
        let err = normalize(&json!(42)).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
    }
}
