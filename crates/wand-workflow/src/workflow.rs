use std::collections::HashMap;

use wand_config::{GraphSpec, NodeSpec};

use crate::error::GraphError;
use crate::graph::Graph;

/// A validated graph, ready for execution.
///
/// Construction checks the whole document and computes the execution layers
/// once; nothing about the graph changes afterwards.
#[derive(Debug, Clone)]
pub struct Workflow {
  nodes: HashMap<String, NodeSpec>,
  graph: Graph,
  layers: Vec<Vec<String>>,
}

impl Workflow {
  /// Validate a submitted graph and compute its layers.
  pub fn from_spec(spec: GraphSpec) -> Result<Self, GraphError> {
    let mut order = Vec::with_capacity(spec.nodes.len());
    let mut nodes = HashMap::with_capacity(spec.nodes.len());

    for node in spec.nodes {
      if node.timeout_seconds == 0 {
        return Err(GraphError::InvalidTimeout(node.id));
      }
      if nodes.contains_key(&node.id) {
        return Err(GraphError::DuplicateNode(node.id));
      }
      order.push(node.id.clone());
      nodes.insert(node.id.clone(), node);
    }

    let mut edges = Vec::with_capacity(spec.edges.len());
    for edge in spec.edges {
      if !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target) {
        return Err(GraphError::DanglingEdge {
          from: edge.source,
          to: edge.target,
        });
      }
      edges.push((edge.source, edge.target));
    }

    let graph = Graph::new(&order, &edges);
    let layers = graph
      .layers()
      .map_err(|nodes| GraphError::CycleDetected { nodes })?;

    Ok(Self {
      nodes,
      graph,
      layers,
    })
  }

  /// Execution layers, in order. Every upstream node of a node in layer `k`
  /// lives in a layer before `k`.
  pub fn layers(&self) -> &[Vec<String>] {
    &self.layers
  }

  /// Get the graph structure for traversal.
  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  /// Get a node by ID.
  pub fn get_node(&self, node_id: &str) -> Option<&NodeSpec> {
    self.nodes.get(node_id)
  }

  /// Number of nodes in the graph.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}
