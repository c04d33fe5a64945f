use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::RunRecord;
use crate::{RunStore, StoreError};

/// Process-local run store.
///
/// Records live only as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryRunStore {
  runs: RwLock<HashMap<String, RunRecord>>,
}

impl MemoryRunStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl RunStore for MemoryRunStore {
  async fn create(&self, record: &RunRecord) -> Result<(), StoreError> {
    let mut runs = self.runs.write().await;
    if runs.contains_key(&record.run_id) {
      return Err(StoreError::AlreadyExists(record.run_id.clone()));
    }
    runs.insert(record.run_id.clone(), record.clone());
    Ok(())
  }

  async fn get(&self, run_id: &str) -> Result<RunRecord, StoreError> {
    self
      .runs
      .read()
      .await
      .get(run_id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(run_id.to_string()))
  }

  async fn update(&self, record: &RunRecord) -> Result<(), StoreError> {
    let mut runs = self.runs.write().await;
    match runs.get_mut(&record.run_id) {
      Some(existing) => {
        *existing = record.clone();
        Ok(())
      }
      None => Err(StoreError::NotFound(record.run_id.clone())),
    }
  }

  async fn list(&self) -> Result<Vec<RunRecord>, StoreError> {
    let mut records: Vec<RunRecord> = self.runs.read().await.values().cloned().collect();
    records.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.run_id.cmp(&b.run_id)));
    Ok(records)
  }
}
