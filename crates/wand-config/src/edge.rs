use serde::{Deserialize, Serialize};

/// A dependency edge: `target` runs only after `source` has finished.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSpec {
  pub source: String,
  pub target: String,
}

impl EdgeSpec {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
    }
  }
}
