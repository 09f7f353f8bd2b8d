//! Transforms: discrete Fourier transform, self-transpose matrix product,
//! and the per-column statistics bundle.

use ndarray::{ArrayD, Axis, Ix1, Ix2};
use serde_json::{Map, Value};

use crate::data::NumericContainer;
use crate::error::{EngineError, Result};
use crate::ops::reductions::Reduction;
use crate::response;

/// DFT along the last axis; applied independently per column for tables.
/// Complex values are encoded as `{"re": .., "im": ..}` objects.
pub fn fourier(input: &NumericContainer) -> Result<Value> {
    match input {
        NumericContainer::Array(arr) => {
            if arr.is_empty() {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            let last = Axis(arr.ndim() - 1);
            let mut flat = Vec::with_capacity(arr.len());
            for lane in arr.lanes(last) {
                let signal: Vec<f64> = lane.iter().copied().collect();
                for (re, im) in dft(&signal) {
                    flat.push(response::complex_pair(re, im));
                }
            }
            Ok(response::nested(arr.shape(), flat))
        }
        NumericContainer::Table(table) => {
            if table.rows() == 0 {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            let mut out = Map::new();
            for (name, values) in table.numeric_columns() {
                let spectrum: Vec<Value> = dft(values)
                    .into_iter()
                    .map(|(re, im)| response::complex_pair(re, im))
                    .collect();
                out.insert(name.to_string(), Value::Array(spectrum));
            }
            if out.is_empty() {
                return Err(EngineError::Operation(
                    "table input has no numeric columns".into(),
                ));
            }
            Ok(Value::Object(out))
        }
    }
}

/// Product of a 2-D array with its own transpose: R×C in, R×R out.
pub fn matrix_multiply(input: &NumericContainer) -> Result<Value> {
    let arr = match input {
        NumericContainer::Array(arr) => arr,
        NumericContainer::Table(_) => {
            return Err(EngineError::Shape(
                "Matrix multiplication requires a 2D array".into(),
            ))
        }
    };
    if arr.is_empty() {
        return Err(EngineError::Operation("Input data is empty".into()));
    }
    let matrix = arr
        .clone()
        .into_dimensionality::<Ix2>()
        .map_err(|_| EngineError::Shape("Matrix multiplication requires a 2D array".into()))?;
    let product = matrix.dot(&matrix.t());
    Ok(response::array_to_json(&product.into_dyn()))
}

/// Mean, population std, min, and max — per numeric column for tables, along
/// axis 0 for arrays.
pub fn statistical_analysis(input: &NumericContainer) -> Result<Value> {
    const STATS: [Reduction; 4] = [
        Reduction::Mean,
        Reduction::Std,
        Reduction::Min,
        Reduction::Max,
    ];

    match input {
        NumericContainer::Array(arr) => {
            if arr.is_empty() {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            let mut out = Map::new();
            for stat in STATS {
                let reduced = axis_zero(stat, arr)?;
                out.insert(stat.name().to_string(), reduced);
            }
            Ok(Value::Object(out))
        }
        NumericContainer::Table(table) => {
            if table.rows() == 0 {
                return Err(EngineError::Operation("Input data is empty".into()));
            }
            let mut out = Map::new();
            for stat in STATS {
                let mut per_column = Map::new();
                for (name, values) in table.numeric_columns() {
                    per_column
                        .insert(name.to_string(), response::json_num(stat.reduce_slice(values)?));
                }
                if per_column.is_empty() {
                    return Err(EngineError::Operation(
                        "table input has no numeric columns".into(),
                    ));
                }
                out.insert(stat.name().to_string(), Value::Object(per_column));
            }
            Ok(Value::Object(out))
        }
    }
}

fn axis_zero(stat: Reduction, arr: &ArrayD<f64>) -> Result<Value> {
    // A 1-D array reduces to a scalar along axis 0.
    if let Ok(series) = arr.clone().into_dimensionality::<Ix1>() {
        let values: Vec<f64> = series.to_vec();
        return Ok(response::json_num(stat.reduce_slice(&values)?));
    }
    let reduced = match stat {
        Reduction::Mean => arr
            .mean_axis(Axis(0))
            .ok_or_else(|| EngineError::Operation("Input data is empty".into()))?,
        Reduction::Std => arr.std_axis(Axis(0), 0.0),
        Reduction::Min => arr.map_axis(Axis(0), |lane| {
            lane.iter().copied().fold(f64::INFINITY, f64::min)
        }),
        Reduction::Max => arr.map_axis(Axis(0), |lane| {
            lane.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }),
        _ => {
            return Err(EngineError::Operation(format!(
                "unsupported statistic: {}",
                stat.name()
            )))
        }
    };
    Ok(response::array_to_json(&reduced))
}

/// Textbook DFT: `X[k] = Σ x[n]·e^(-2πi·k·n/N)`. Quadratic, which is fine
/// for node-sized payloads.
pub fn dft(signal: &[f64]) -> Vec<(f64, f64)> {
    let n = signal.len();
    let mut spectrum = Vec::with_capacity(n);
    for k in 0..n {
        let mut re = 0.0;
        let mut im = 0.0;
        for (idx, &x) in signal.iter().enumerate() {
            let angle = -2.0 * std::f64::consts::PI * (k * idx) as f64 / n as f64;
            re += x * angle.cos();
            im += x * angle.sin();
        }
        spectrum.push((re, im));
    }
    spectrum
}
