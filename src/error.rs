//! Error taxonomy for the node executor engine.

use thiserror::Error;

/// Everything that can go wrong while handling one invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing invocation parameters.
    #[error("Invalid JSON parameters: {0}")]
    Parameter(String),

    /// Input representation incompatible with the requested operation.
    #[error("{0}")]
    Shape(String),

    /// Numerically invalid operation (empty input, degenerate data).
    #[error("{0}")]
    Operation(String),

    /// Operation name not present in the catalog.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The plotting backend failed mid-render.
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Recoverable errors are per-node results: they go to stdout as a
    /// structured envelope and the process exits cleanly. Parameter and
    /// infrastructure failures go to stderr with a nonzero exit.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Shape(_) | Self::Operation(_) | Self::UnknownOperation(_)
        )
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
