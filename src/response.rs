//! Result serializer: JSON envelopes and JSON-safe numeric conversion.
//!
//! Envelope field usage mirrors the node protocol: reductions report under
//! `result`, transforms and `generate_data` under `data`, visualizations
//! under `result` plus `vizType` and `nextCounter`. Errors carry an `error`
//! field and never a result payload.

use ndarray::ArrayD;
use serde_json::{json, Map, Value};

use crate::error::EngineError;
use crate::viz::RenderOutcome;

/// Convert a float to a JSON number. NaN and infinities serialize to the
/// documented sentinel `null`; they are never emitted as raw tokens.
pub fn json_num(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn numbers(values: &[f64]) -> Value {
    Value::Array(values.iter().copied().map(json_num).collect())
}

/// Complex value encoding used for every complex output.
pub fn complex_pair(re: f64, im: f64) -> Value {
    json!({ "re": json_num(re), "im": json_num(im) })
}

/// Rebuild a nested JSON array from row-major flat items and a shape.
pub fn nested(shape: &[usize], items: Vec<Value>) -> Value {
    match shape.split_first() {
        None => items.into_iter().next().unwrap_or(Value::Null),
        Some((&outer, rest)) => {
            let inner: usize = rest.iter().product();
            let mut iter = items.into_iter();
            let mut out = Vec::with_capacity(outer);
            for _ in 0..outer {
                let chunk: Vec<Value> = iter.by_ref().take(inner).collect();
                out.push(nested(rest, chunk));
            }
            Value::Array(out)
        }
    }
}

/// N-D array to nested JSON lists; a 0-dimensional array becomes a scalar.
pub fn array_to_json(arr: &ArrayD<f64>) -> Value {
    let flat: Vec<Value> = arr.iter().copied().map(json_num).collect();
    nested(arr.shape(), flat)
}

pub fn reduction(node_id: &str, operation: &str, result: Value) -> Value {
    json!({
        "nodeId": node_id,
        "operation": operation,
        "result": result,
        "message": format!("{} calculation completed", capitalize(operation)),
    })
}

pub fn transform(node_id: &str, operation: &str, data: Value) -> Value {
    json!({
        "nodeId": node_id,
        "operation": operation,
        "data": data,
        "message": format!("{} operation completed successfully", operation),
    })
}

pub fn generated(node_id: &str, data: &[f64], size: usize) -> Value {
    json!({
        "nodeId": node_id,
        "data": numbers(data),
        "message": format!("Sample data generated (size: {})", size),
    })
}

pub fn visualization(node_id: &str, viz_type: &str, outcome: &RenderOutcome, next_counter: u64) -> Value {
    let mut result = Map::new();
    result.insert(
        "output_path".into(),
        Value::String(outcome.output_path.display().to_string()),
    );
    if let Some(slope) = outcome.slope {
        result.insert("slope".into(), json_num(slope));
    }
    if let Some(intercept) = outcome.intercept {
        result.insert("intercept".into(), json_num(intercept));
    }
    json!({
        "nodeId": node_id,
        "operation": "visualize",
        "vizType": viz_type,
        "result": Value::Object(result),
        "message": format!("Visualization created: {}", viz_type),
        "nextCounter": next_counter,
    })
}

pub fn failure(node_id: &str, operation: Option<&str>, error: &EngineError) -> Value {
    let mut envelope = Map::new();
    envelope.insert("nodeId".into(), Value::String(node_id.to_string()));
    if let Some(op) = operation {
        envelope.insert("operation".into(), Value::String(op.to_string()));
    }
    envelope.insert("error".into(), Value::String(error.to_string()));
    Value::Object(envelope)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
