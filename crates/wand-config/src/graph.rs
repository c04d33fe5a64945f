use serde::{Deserialize, Serialize};

use crate::edge::EdgeSpec;
use crate::node::NodeSpec;

/// A submitted graph: nodes plus dependency edges.
///
/// Nothing here is validated yet; see `wand_workflow::Workflow::from_spec`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
  pub nodes: Vec<NodeSpec>,
  #[serde(default)]
  pub edges: Vec<EdgeSpec>,
}

impl GraphSpec {
  pub fn new(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
    Self { nodes, edges }
  }
}
