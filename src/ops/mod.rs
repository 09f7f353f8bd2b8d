//! Operation catalog and dispatcher.
//!
//! The operation name resolves once into a tagged `Operation`; each variant
//! declares how it acquires input and which container shapes it accepts.

pub mod reductions;
pub mod transforms;

use std::path::{Path, PathBuf};

use ndarray::Ix1;
use serde_json::Value;
use tracing::debug;

use crate::data::{normalize, sample, NumericContainer};
use crate::error::{EngineError, Result};
use crate::request::Request;
use crate::response;
use crate::viz::{self, VizKind};

pub use reductions::Reduction;

/// Synthetic fallback dimensions for math operations invoked without input.
const FALLBACK_ROWS: usize = 10;
const FALLBACK_COLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Reduce(Reduction),
    Fourier,
    MatrixMultiply,
    StatisticalAnalysis,
    GenerateData,
    Visualize,
}

impl Operation {
    /// Exact-match resolution against the catalog.
    pub fn resolve(name: &str) -> Result<Self> {
        if let Some(reduction) = Reduction::from_name(name) {
            return Ok(Operation::Reduce(reduction));
        }
        Ok(match name {
            "fourier" => Operation::Fourier,
            "matrix_multiply" => Operation::MatrixMultiply,
            "statistical_analysis" => Operation::StatisticalAnalysis,
            "generate_data" => Operation::GenerateData,
            "visualize" => Operation::Visualize,
            _ => return Err(EngineError::UnknownOperation(name.to_string())),
        })
    }
}

/// Execute one invocation and build its success envelope.
pub fn execute(req: &Request) -> Result<Value> {
    let name = req
        .operation
        .as_deref()
        .ok_or_else(|| EngineError::Parameter("missing required field: operation".into()))?;
    let op = Operation::resolve(name)?;
    debug!(operation = name, node = %req.node_id, "dispatching");

    match op {
        Operation::Reduce(reduction) => {
            let container = reduction_input(req, reduction)?;
            let result = reduction.apply(&container, &req.dimensions)?;
            Ok(response::reduction(&req.node_id, name, result))
        }
        Operation::Fourier => {
            let container = input_or_fallback(req)?;
            Ok(response::transform(&req.node_id, name, transforms::fourier(&container)?))
        }
        Operation::MatrixMultiply => {
            let container = input_or_fallback(req)?;
            Ok(response::transform(
                &req.node_id,
                name,
                transforms::matrix_multiply(&container)?,
            ))
        }
        Operation::StatisticalAnalysis => {
            let container = input_or_fallback(req)?;
            Ok(response::transform(
                &req.node_id,
                name,
                transforms::statistical_analysis(&container)?,
            ))
        }
        Operation::GenerateData => {
            let size = req.size();
            let data = sample::sine_wave(size, req.seed());
            Ok(response::generated(&req.node_id, &data, size))
        }
        Operation::Visualize => visualize(req),
    }
}

/// Reductions require input, with one exception: an axis-selected `sum`
/// without input falls back to the seeded sample matrix.
fn reduction_input(req: &Request, reduction: Reduction) -> Result<NumericContainer> {
    match req.input() {
        Some(raw) => normalize(raw),
        None if reduction == Reduction::Sum && !req.dimensions.is_empty() => Ok(
            NumericContainer::Array(sample::uniform_matrix(FALLBACK_ROWS, FALLBACK_COLS, req.seed())),
        ),
        None => Err(EngineError::Operation("No input data provided".into())),
    }
}

/// Math transforms tolerate absent input by substituting the seeded sample
/// matrix, for exploratory wiring of a flow before real data arrives.
fn input_or_fallback(req: &Request) -> Result<NumericContainer> {
    match req.input() {
        Some(raw) => normalize(raw),
        None => Ok(NumericContainer::Array(sample::uniform_matrix(
            FALLBACK_ROWS,
            FALLBACK_COLS,
            req.seed(),
        ))),
    }
}

fn visualize(req: &Request) -> Result<Value> {
    let raw = req
        .input()
        .ok_or_else(|| EngineError::Operation("No input data provided for visualization".into()))?;
    let series = normalize(raw)?
        .into_array("visualization")?
        .into_dimensionality::<Ix1>()
        .map_err(|_| {
            EngineError::Shape("visualization requires a one-dimensional series".into())
        })?;

    let kind_name = req.viz_type.as_deref().unwrap_or("line");
    let kind = VizKind::from_name(kind_name)
        .ok_or_else(|| EngineError::Operation(format!("Unknown visualization type: {}", kind_name)))?;

    let target = output_target(req);
    let outcome = viz::render(&series.to_vec(), kind, &req.viz_params, &target)?;
    Ok(response::visualization(
        &req.node_id,
        kind.name(),
        &outcome,
        req.counter + 1,
    ))
}

/// Explicit `outputPath` wins; otherwise the path is
/// `<outputDir>/<pattern>_<counter, zero-padded to 3>.png`.
fn output_target(req: &Request) -> PathBuf {
    match &req.output_path {
        Some(path) => PathBuf::from(path),
        None => Path::new(&req.output_dir).join(format!(
            "{}_{:03}.png",
            req.filename_pattern(),
            req.counter
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(payload: Value) -> Request {
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn resolve_covers_the_catalog() {
        assert_eq!(
            Operation::resolve("median").unwrap(),
            Operation::Reduce(Reduction::Median)
        );
        assert_eq!(Operation::resolve("fourier").unwrap(), Operation::Fourier);
        assert!(matches!(
            Operation::resolve("bogus_op").unwrap_err(),
            EngineError::UnknownOperation(name) if name == "bogus_op"
        ));
    }

    #[test]
    fn default_output_target_is_counter_padded() {
        let req = request(json!({
            "operation": "visualize",
            "filenamePattern": "viz_x",
            "counter": 5,
            "outputDir": "/tmp/out",
        }));
        assert_eq!(
            output_target(&req),
            PathBuf::from("/tmp/out/viz_x_005.png")
        );
    }

    #[test]
    fn explicit_output_path_wins() {
        let req = request(json!({
            "operation": "visualize",
            "outputPath": "/tmp/custom.svg",
        }));
        assert_eq!(output_target(&req), PathBuf::from("/tmp/custom.svg"));
    }

    #[test]
    fn sum_with_axes_and_no_input_uses_sample_matrix() {
        let req = request(json!({ "operation": "sum", "dimensions": [0] }));
        let envelope = execute(&req).unwrap();
        let row = envelope["result"].as_array().unwrap();
        assert_eq!(row.len(), FALLBACK_COLS);
    }

    #[test]
    fn mean_without_input_is_an_operation_error() {
        let req = request(json!({ "operation": "mean" }));
        let err = execute(&req).unwrap_err();
        assert!(matches!(err, EngineError::Operation(_)));
    }

    #[test]
    fn missing_operation_is_a_parameter_error() {
        let req = request(json!({ "nodeId": "n1" }));
        let err = execute(&req).unwrap_err();
        assert!(matches!(err, EngineError::Parameter(_)));
    }
}
