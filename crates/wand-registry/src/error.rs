use thiserror::Error;

/// A graph referenced a name that nothing is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("unknown agent: {0}")]
  UnknownAgent(String),

  #[error("unknown tool: {0}")]
  UnknownTool(String),
}
