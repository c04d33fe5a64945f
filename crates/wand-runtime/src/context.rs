//! Per-run accumulation of node results.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node id → recorded result (or `{"error": ...}`) for one run.
///
/// Each node id is written exactly once, after that node reaches a terminal
/// state. Entries are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunContext {
  entries: BTreeMap<String, Value>,
}

impl RunContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a node's terminal entry.
  ///
  /// Returns `false`, leaving the existing entry untouched, if the node was
  /// already recorded.
  pub fn record(&mut self, node_id: impl Into<String>, entry: Value) -> bool {
    match self.entries.entry(node_id.into()) {
      Entry::Vacant(slot) => {
        slot.insert(entry);
        true
      }
      Entry::Occupied(_) => false,
    }
  }

  pub fn get(&self, node_id: &str) -> Option<&Value> {
    self.entries.get(node_id)
  }

  pub fn contains(&self, node_id: &str) -> bool {
    self.entries.contains_key(node_id)
  }

  /// Whether the node's entry is an error entry.
  pub fn is_error(&self, node_id: &str) -> bool {
    self
      .get(node_id)
      .and_then(Value::as_object)
      .is_some_and(|entry| entry.contains_key("error"))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.entries.iter()
  }

  pub fn into_inner(self) -> BTreeMap<String, Value> {
    self.entries
  }
}

impl FromIterator<(String, Value)> for RunContext {
  fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
    let mut context = Self::new();
    for (node_id, entry) in iter {
      context.record(node_id, entry);
    }
    context
  }
}
