use serde::{Deserialize, Serialize};

use crate::graph::GraphSpec;

/// Concurrency cap used when a request does not set one.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// A run submission: the graph plus the concurrency cap for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
  pub graph: GraphSpec,
  #[serde(default = "default_concurrency")]
  pub concurrency: usize,
}

impl RunRequest {
  pub fn new(graph: GraphSpec) -> Self {
    Self {
      graph,
      concurrency: DEFAULT_CONCURRENCY,
    }
  }
}

fn default_concurrency() -> usize {
  DEFAULT_CONCURRENCY
}
