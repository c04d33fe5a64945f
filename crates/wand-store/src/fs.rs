use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::types::RunRecord;
use crate::{RunStore, StoreError};

/// Filesystem-based run store.
///
/// Records are stored one file per run:
/// ```text
/// {root}/
/// └── runs/
///     ├── 0b6f6c1e-....json
///     └── 9d2a47f3-....json
/// ```
pub struct FsRunStore {
  root: PathBuf,
}

impl FsRunStore {
  /// Create a store rooted at the given data directory.
  ///
  /// Nothing is created on disk until the first record is written.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the store.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn runs_dir(&self) -> PathBuf {
    self.root.join("runs")
  }

  /// Path of a run's record file, or `None` for ids that are not plain file names.
  fn record_path(&self, run_id: &str) -> Option<PathBuf> {
    let valid = !run_id.is_empty()
      && run_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| self.runs_dir().join(format!("{}.json", run_id)))
  }

  async fn write(&self, path: &Path, record: &RunRecord) -> Result<(), StoreError> {
    fs::create_dir_all(self.runs_dir()).await?;

    // Write-then-rename so readers never see a partial record.
    let tmp = path.with_extension("json.tmp");
    let content = serde_json::to_vec_pretty(record)?;
    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
  }

  async fn read(path: &Path) -> Result<RunRecord, StoreError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
  }
}

#[async_trait]
impl RunStore for FsRunStore {
  async fn create(&self, record: &RunRecord) -> Result<(), StoreError> {
    let path = self
      .record_path(&record.run_id)
      .ok_or_else(|| StoreError::InvalidId(record.run_id.clone()))?;
    if fs::try_exists(&path).await? {
      return Err(StoreError::AlreadyExists(record.run_id.clone()));
    }
    self.write(&path, record).await
  }

  async fn get(&self, run_id: &str) -> Result<RunRecord, StoreError> {
    let path = self
      .record_path(run_id)
      .ok_or_else(|| StoreError::NotFound(run_id.to_string()))?;
    match Self::read(&path).await {
      Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
        Err(StoreError::NotFound(run_id.to_string()))
      }
      other => other,
    }
  }

  async fn update(&self, record: &RunRecord) -> Result<(), StoreError> {
    let path = self
      .record_path(&record.run_id)
      .ok_or_else(|| StoreError::InvalidId(record.run_id.clone()))?;
    if !fs::try_exists(&path).await? {
      return Err(StoreError::NotFound(record.run_id.clone()));
    }
    self.write(&path, record).await
  }

  async fn list(&self) -> Result<Vec<RunRecord>, StoreError> {
    let runs_dir = self.runs_dir();
    if !fs::try_exists(&runs_dir).await? {
      return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut entries = fs::read_dir(&runs_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some("json") {
        continue;
      }
      records.push(Self::read(&path).await?);
    }

    records.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.run_id.cmp(&b.run_id)));
    Ok(records)
  }
}
