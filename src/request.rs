//! Invocation payload model.
//!
//! One JSON object per invocation. Every optional field declares its default
//! here rather than at the point of use.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::viz::style::VizParams;

/// Default sample size for the `generate_data` operation.
pub const DEFAULT_SIZE: usize = 100;
/// Default seed for synthetic data.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Opaque passthrough identifier echoed in every response.
    #[serde(default = "default_node_id")]
    pub node_id: String,

    /// Catalog operation name. Required; a missing operation is a parameter
    /// error rather than an implicit default.
    #[serde(default)]
    pub operation: Option<String>,

    /// Raw input: a number sequence (possibly nested), a record sequence, or
    /// a column mapping.
    #[serde(default)]
    pub input_data: Option<Value>,

    /// Axis selector for reductions. Accepts a single axis or a list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub dimensions: Vec<usize>,

    /// Visualization kind for the `visualize` operation (default: line).
    #[serde(default)]
    pub viz_type: Option<String>,

    /// Visualization style overrides.
    #[serde(default)]
    pub viz_params: VizParams,

    /// Directory for generated images; created if missing.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Explicit output file path; overrides `outputDir`/`filenamePattern`.
    #[serde(default)]
    pub output_path: Option<String>,

    /// Filename stem for generated images (default: `viz_<nodeId>`).
    #[serde(default)]
    pub filename_pattern: Option<String>,

    /// Caller-threaded counter for unique output filenames. The response
    /// carries `nextCounter = counter + 1`.
    #[serde(default = "default_counter")]
    pub counter: u64,

    /// Seed for synthetic data generation.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Sample size for `generate_data`.
    #[serde(default)]
    pub size: Option<usize>,
}

impl Request {
    /// Input data, with absent, null, and empty values collapsed to `None`.
    pub fn input(&self) -> Option<&Value> {
        match &self.input_data {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    pub fn filename_pattern(&self) -> String {
        self.filename_pattern
            .clone()
            .unwrap_or_else(|| format!("viz_{}", self.node_id))
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn size(&self) -> usize {
        self.size.unwrap_or(DEFAULT_SIZE)
    }
}

fn default_node_id() -> String {
    "unknown".to_string()
}

fn default_output_dir() -> String {
    "./outputs".to_string()
}

fn default_counter() -> u64 {
    1
}

/// `dimensions` may arrive as a bare integer or as a list of axes.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(usize),
        Many(Vec<usize>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(axis) => vec![axis],
        OneOrMany::Many(axes) => axes,
    })
}
