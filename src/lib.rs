//! Flowboard node executor engine.
//!
//! One process handles exactly one operation: a JSON payload describing the
//! requested operation and its input arrives on argv (or stdin), the engine
//! normalizes the input into a numeric container, dispatches into the
//! operation catalog, and emits a JSON envelope on stdout. Visualization
//! operations additionally persist an image file. The engine is stateless
//! across invocations apart from the caller-threaded counter used for output
//! file naming.

pub mod cli;
pub mod data;
pub mod error;
pub mod ops;
pub mod request;
pub mod response;
pub mod viz;

use serde_json::Value;

use crate::request::Request;

/// Run one invocation and fold any error into the envelope the caller sees.
///
/// The returned flag is true when the envelope belongs on stdout (success or
/// a recoverable per-node error); false means stderr plus a nonzero exit.
pub fn invoke(req: &Request) -> (Value, bool) {
    match ops::execute(req) {
        Ok(envelope) => (envelope, true),
        Err(err) => {
            let recoverable = err.is_recoverable();
            let envelope = response::failure(&req.node_id, req.operation.as_deref(), &err);
            (envelope, recoverable)
        }
    }
}
