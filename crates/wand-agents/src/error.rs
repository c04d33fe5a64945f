use thiserror::Error;

/// A failure raised by an agent instead of being reported in its result.
#[derive(Debug, Error)]
pub enum AgentError {
  #[error("{0}")]
  Failed(String),
}
