//! Node outcome types.

use serde_json::{Value, json};
use wand_config::Payload;

use crate::error::NodeError;

/// Terminal outcome of one node's full attempt sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutcome {
  Succeeded { output: Payload, attempts: u32 },
  Failed { error: NodeError, attempts: u32 },
}

impl NodeOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, Self::Succeeded { .. })
  }

  /// Number of attempts that were started.
  pub fn attempts(&self) -> u32 {
    match self {
      Self::Succeeded { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
    }
  }

  /// The value recorded in the run context for this outcome.
  pub fn to_entry(&self) -> Value {
    match self {
      Self::Succeeded { output, .. } => Value::Object(output.clone()),
      Self::Failed { error, attempts } => failure_entry(format!(
        "node failed after {} attempt(s): {}",
        attempts, error
      )),
    }
  }
}

/// Build an `{"error": message}` context entry.
pub(crate) fn failure_entry(message: String) -> Value {
  json!({ "error": message })
}
