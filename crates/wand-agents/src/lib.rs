//! Wand Agents
//!
//! Agents are the step implementations a graph node dispatches to. An agent
//! is constructed per node from the node's parameters and tool instances,
//! then invoked once per attempt with the node's resolved inputs.
//!
//! By convention agents report their own failures as an `{"error": ...}`
//! result. Returning `Err` is also allowed; the runtime treats it as a
//! retryable runtime failure.

mod echo;
mod error;
mod http_get;
mod sum;

use std::sync::Arc;

use async_trait::async_trait;
use wand_config::Payload;
use wand_tools::Tool;

pub use echo::EchoAgent;
pub use error::AgentError;
pub use http_get::HttpGetAgent;
pub use sum::SumAgent;

/// A step implementation invoked with resolved inputs.
#[async_trait]
pub trait Agent: Send + Sync {
  /// Run the agent once.
  async fn run(&self, inputs: Payload) -> Result<Payload, AgentError>;
}

/// Everything an agent is constructed from: its parameters and tools.
#[derive(Clone, Default)]
pub struct AgentContext {
  pub params: Payload,
  pub tools: Vec<Arc<dyn Tool>>,
}

impl AgentContext {
  pub fn new(params: Payload, tools: Vec<Arc<dyn Tool>>) -> Self {
    Self { params, tools }
  }

  /// Find a configured tool by registry name.
  pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
    self.tools.iter().find(|t| t.name() == name)
  }
}

impl std::fmt::Debug for AgentContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let tools: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
    f.debug_struct("AgentContext")
      .field("params", &self.params)
      .field("tools", &tools)
      .finish()
  }
}

/// Build a single-entry `{"error": message}` result.
pub fn error_result(message: impl Into<String>) -> Payload {
  let mut result = Payload::new();
  result.insert(
    "error".to_string(),
    serde_json::Value::String(message.into()),
  );
  result
}
