use std::collections::{HashMap, HashSet};

/// Graph structure for traversal and layering.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Node ids in document order.
  order: Vec<String>,
  /// Adjacency list: node_id -> list of downstream node_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: node_id -> list of upstream node_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with no incoming edges.
  entry_points: Vec<String>,
}

impl Graph {
  /// Build a graph from node ids and `(source, target)` edges.
  ///
  /// Edges whose endpoints are not in `node_ids` are still recorded; callers
  /// are expected to have rejected them already. Repeated edges are collapsed.
  pub fn new(node_ids: &[String], edges: &[(String, String)]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for node_id in node_ids {
      adjacency.entry(node_id.clone()).or_default();
      reverse_adjacency.entry(node_id.clone()).or_default();
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for (from, to) in edges {
      if !seen.insert((from.as_str(), to.as_str())) {
        continue;
      }
      adjacency.entry(from.clone()).or_default().push(to.clone());
      reverse_adjacency
        .entry(to.clone())
        .or_default()
        .push(from.clone());
    }

    let entry_points: Vec<String> = node_ids
      .iter()
      .filter(|id| reverse_adjacency.get(*id).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();

    Self {
      order: node_ids.to_vec(),
      adjacency,
      reverse_adjacency,
      entry_points,
    }
  }

  /// Get entry points (nodes with no incoming edges), in document order.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Partition the nodes into Kahn generations.
  ///
  /// Each layer holds every node whose upstream nodes all live in earlier
  /// layers. Within a layer, ids keep document order.
  ///
  /// Returns `Err` with the ids that could not be placed when the graph has a
  /// cycle.
  pub fn layers(&self) -> Result<Vec<Vec<String>>, Vec<String>> {
    let mut pending: HashMap<&str, usize> = self
      .order
      .iter()
      .map(|id| (id.as_str(), self.upstream(id).len()))
      .collect();

    let mut layers = Vec::new();
    let mut current: Vec<String> = self
      .order
      .iter()
      .filter(|id| pending.get(id.as_str()) == Some(&0))
      .cloned()
      .collect();
    let mut placed = 0;

    while !current.is_empty() {
      placed += current.len();

      let mut released: HashSet<&str> = HashSet::new();
      for id in &current {
        for down in self.downstream(id) {
          if let Some(count) = pending.get_mut(down.as_str()) {
            *count -= 1;
            if *count == 0 {
              released.insert(down.as_str());
            }
          }
        }
      }

      let next: Vec<String> = self
        .order
        .iter()
        .filter(|id| released.contains(id.as_str()))
        .cloned()
        .collect();
      layers.push(std::mem::replace(&mut current, next));
    }

    if placed < self.order.len() {
      let remaining = self
        .order
        .iter()
        .filter(|id| pending.get(id.as_str()).is_some_and(|count| *count > 0))
        .cloned()
        .collect();
      return Err(remaining);
    }

    Ok(layers)
  }
}
