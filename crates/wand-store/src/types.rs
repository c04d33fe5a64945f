use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wand_config::Payload;

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
  Running,
  Succeeded,
  Failed,
}

impl RunStatus {
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Self::Running)
  }
}

impl std::fmt::Display for RunStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Running => "running",
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
    };
    f.write_str(s)
  }
}

/// A run as stored.
///
/// `result` holds one entry per node once the run has succeeded. `error`
/// is set only when the run was rejected before any node executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
  pub run_id: String,
  pub status: RunStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub result: Option<Payload>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub started_at: DateTime<Utc>,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
}

impl RunRecord {
  /// A freshly submitted run.
  pub fn running(run_id: impl Into<String>) -> Self {
    Self {
      run_id: run_id.into(),
      status: RunStatus::Running,
      result: None,
      error: None,
      started_at: Utc::now(),
      completed_at: None,
    }
  }

  /// Mark the run as finished with one entry per node.
  pub fn succeed(&mut self, result: Payload) {
    self.status = RunStatus::Succeeded;
    self.result = Some(result);
    self.completed_at = Some(Utc::now());
  }

  /// Mark the run as rejected.
  pub fn fail(&mut self, error: impl Into<String>) {
    self.status = RunStatus::Failed;
    self.error = Some(error.into());
    self.completed_at = Some(Utc::now());
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_status_serializes_snake_case() {
    assert_eq!(serde_json::to_value(RunStatus::Succeeded).unwrap(), json!("succeeded"));
    assert_eq!(RunStatus::Running.to_string(), "running");
  }

  #[test]
  fn test_running_record_omits_result_and_error() {
    let record = RunRecord::running("r1");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["status"], json!("running"));
    assert!(value.get("result").is_none());
    assert!(value.get("error").is_none());
    assert!(!record.status.is_terminal());
  }

  #[test]
  fn test_fail_sets_error_and_completion() {
    let mut record = RunRecord::running("r1");
    record.fail("graph validation failed: cycle detected among nodes: a, b");
    assert_eq!(record.status, RunStatus::Failed);
    assert!(record.error.as_deref().unwrap().contains("cycle"));
    assert!(record.completed_at.is_some());
    assert!(record.result.is_none());
  }
}
