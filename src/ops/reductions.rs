//! Statistical reductions: mean, sum, variance, std, min, max, median.
//!
//! Variance and standard deviation use population semantics (divisor N).
//! Array input reduces over all elements by default, or along the requested
//! axes. Table input reduces each numeric column to a scalar.

use ndarray::{ArrayD, Axis};
use serde_json::{Map, Value};

use crate::data::NumericContainer;
use crate::error::{EngineError, Result};
use crate::response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Sum,
    Variance,
    Std,
    Min,
    Max,
    Median,
}

impl Reduction {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mean" => Reduction::Mean,
            "sum" => Reduction::Sum,
            "variance" => Reduction::Variance,
            "std" => Reduction::Std,
            "min" => Reduction::Min,
            "max" => Reduction::Max,
            "median" => Reduction::Median,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reduction::Mean => "mean",
            Reduction::Sum => "sum",
            Reduction::Variance => "variance",
            Reduction::Std => "std",
            Reduction::Min => "min",
            Reduction::Max => "max",
            Reduction::Median => "median",
        }
    }

    pub fn apply(&self, input: &NumericContainer, axes: &[usize]) -> Result<Value> {
        match input {
            NumericContainer::Array(arr) => {
                if arr.is_empty() {
                    return Err(EngineError::Operation("Input data is empty".into()));
                }
                if axes.is_empty() {
                    let flat: Vec<f64> = arr.iter().copied().collect();
                    Ok(response::json_num(self.reduce_slice(&flat)?))
                } else {
                    let reduced = self.reduce_axes(arr, axes)?;
                    Ok(response::array_to_json(&reduced))
                }
            }
            NumericContainer::Table(table) => {
                if table.rows() == 0 {
                    return Err(EngineError::Operation("Input data is empty".into()));
                }
                let mut out = Map::new();
                for (name, values) in table.numeric_columns() {
                    out.insert(name.to_string(), response::json_num(self.reduce_slice(values)?));
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

    /// Reduce a non-empty slice to a scalar.
    pub fn reduce_slice(&self, values: &[f64]) -> Result<f64> {
        if values.is_empty() {
            return Err(EngineError::Operation("Input data is empty".into()));
        }
        Ok(match self {
            Reduction::Mean => mean(values),
            Reduction::Sum => values.iter().sum(),
            Reduction::Variance => population_variance(values),
            Reduction::Std => population_variance(values).sqrt(),
            Reduction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reduction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reduction::Median => median(values),
        })
    }

    fn reduce_axes(&self, arr: &ArrayD<f64>, axes: &[usize]) -> Result<ArrayD<f64>> {
        for &axis in axes {
            if axis >= arr.ndim() {
                return Err(EngineError::Shape(format!(
                    "axis {} is out of bounds for {}-dimensional input",
                    axis,
                    arr.ndim()
                )));
            }
        }

        let mut sorted: Vec<usize> = axes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        // Variance, std, and median do not compose across sequential axis
        // reductions, so they take exactly one axis.
        if sorted.len() > 1 && matches!(self, Reduction::Variance | Reduction::Std | Reduction::Median) {
            return Err(EngineError::Operation(format!(
                "{} supports a single reduction axis",
                self.name()
            )));
        }

        let mut current = arr.clone();
        // Reduce from the highest axis down so earlier indices stay valid.
        for &axis in sorted.iter().rev() {
            current = self.reduce_one_axis(&current, Axis(axis))?;
        }
        Ok(current)
    }

    fn reduce_one_axis(&self, arr: &ArrayD<f64>, axis: Axis) -> Result<ArrayD<f64>> {
        Ok(match self {
            Reduction::Sum => arr.sum_axis(axis),
            Reduction::Mean => arr
                .mean_axis(axis)
                .ok_or_else(|| EngineError::Operation("Input data is empty".into()))?,
            Reduction::Variance => arr.var_axis(axis, 0.0),
            Reduction::Std => arr.std_axis(axis, 0.0),
            Reduction::Min => {
                arr.map_axis(axis, |lane| lane.iter().copied().fold(f64::INFINITY, f64::min))
            }
            Reduction::Max => arr.map_axis(axis, |lane| {
                lane.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }),
            Reduction::Median => arr.map_axis(axis, |lane| {
                let values: Vec<f64> = lane.iter().copied().collect();
                median(&values)
            }),
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Standard even/odd rule: middle element after sorting, or the average of
/// the two middle elements.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize;
    use approx::assert_relative_eq;
    use ndarray::IxDyn;
    use serde_json::json;

    fn array(values: Vec<f64>) -> NumericContainer {
        let len = values.len();
        NumericContainer::Array(ArrayD::from_shape_vec(IxDyn(&[len]), values).unwrap())
    }

    #[test]
    fn variance_matches_mean_of_squared_deviations() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&data);
        let expected = mean(&data.iter().map(|v| (v - m) * (v - m)).collect::<Vec<_>>());
        assert_relative_eq!(population_variance(&data), expected, epsilon = 1e-12);
        // This data set has population variance exactly 4.
        assert_relative_eq!(population_variance(&data), 4.0, epsilon = 1e-12);
        assert_relative_eq!(
            Reduction::Std.reduce_slice(&data).unwrap(),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn median_odd_and_even() {
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn reduces_over_all_elements_by_default() {
        let result = Reduction::Sum.apply(&array(vec![1.0, 2.0, 3.0]), &[]).unwrap();
        assert_eq!(result, json!(6.0));
    }

    #[test]
    fn sum_along_axis() {
        let input = normalize(&json!([[1, 2, 3], [4, 5, 6]])).unwrap();
        assert_eq!(
            Reduction::Sum.apply(&input, &[0]).unwrap(),
            json!([5.0, 7.0, 9.0])
        );
        assert_eq!(
            Reduction::Sum.apply(&input, &[1]).unwrap(),
            json!([6.0, 15.0])
        );
        assert_eq!(Reduction::Sum.apply(&input, &[0, 1]).unwrap(), json!(21.0));
    }

    #[test]
    fn variance_rejects_multiple_axes() {
        let input = normalize(&json!([[1, 2], [3, 4]])).unwrap();
        let err = Reduction::Variance.apply(&input, &[0, 1]).unwrap_err();
        assert!(matches!(err, EngineError::Operation(_)));
    }

    #[test]
    fn axis_out_of_bounds_is_a_shape_error() {
        let input = normalize(&json!([1, 2, 3])).unwrap();
        let err = Reduction::Sum.apply(&input, &[2]).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
    }

    #[test]
    fn table_reduction_maps_numeric_columns() {
        let input = normalize(&json!({
            "a": [1, 2, 3],
            "b": [4, 5, 6],
            "label": ["x", "y", "z"],
        }))
        .unwrap();
        let result = Reduction::Mean.apply(&input, &[]).unwrap();
        assert_eq!(result, json!({ "a": 2.0, "b": 5.0 }));
    }

    #[test]
    fn table_without_numeric_columns_errors() {
        let input = normalize(&json!({ "label": ["x", "y"] })).unwrap();
        let err = Reduction::Mean.apply(&input, &[]).unwrap_err();
        assert!(matches!(err, EngineError::Operation(_)));
    }

    #[test]
    fn empty_slice_errors() {
        let err = Reduction::Mean.reduce_slice(&[]).unwrap_err();
        assert!(matches!(err, EngineError::Operation(_)));
    }
}
