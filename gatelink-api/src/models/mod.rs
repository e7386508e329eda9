mod command;
mod settings;
mod status;

pub use command::*;
pub use settings::*;
pub use status::*;

use serde_json::Value;

use crate::Outcome;

/// Reads the `code` field of a reply body. A body without an integer code
/// counts as a failed operation.
pub fn reply_outcome(body: &Value) -> Outcome {
    body.get("code")
        .and_then(Value::as_i64)
        .map(Outcome::interpret)
        .unwrap_or(Outcome::OperationFailed)
}
