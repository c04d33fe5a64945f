//! Wand Store
//!
//! This crate provides the storage trait and implementations for run
//! records. A record tracks one graph run from submission to its final
//! status, together with the run's results or its rejection message.
//!
//! The [`RunStore`] trait defines operations for:
//! - Creating a record when a run is submitted
//! - Replacing it as the run progresses
//! - Looking records up by id and listing run history

mod fs;
mod memory;
mod types;

pub use fs::FsRunStore;
pub use memory::MemoryRunStore;
pub use types::{RunRecord, RunStatus};

use async_trait::async_trait;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested record was not found.
  #[error("run not found: {0}")]
  NotFound(String),

  /// The run id cannot be used as a record key.
  #[error("invalid run id: {0:?}")]
  InvalidId(String),

  /// A record with this id already exists.
  #[error("run already exists: {0}")]
  AlreadyExists(String),

  /// Reading or writing the backing files failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored record could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Storage trait for run records.
#[async_trait]
pub trait RunStore: Send + Sync {
  /// Store a new record.
  async fn create(&self, record: &RunRecord) -> Result<(), StoreError>;

  /// Get a record by run id.
  async fn get(&self, run_id: &str) -> Result<RunRecord, StoreError>;

  /// Replace an existing record.
  async fn update(&self, record: &RunRecord) -> Result<(), StoreError>;

  /// List all records, oldest first.
  async fn list(&self) -> Result<Vec<RunRecord>, StoreError>;
}
