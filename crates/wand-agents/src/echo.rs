use async_trait::async_trait;
use serde_json::Value;
use wand_config::Payload;

use crate::{Agent, AgentContext, AgentError};

/// Returns its inputs and parameters unchanged.
#[derive(Debug)]
pub struct EchoAgent {
  ctx: AgentContext,
}

impl EchoAgent {
  pub const NAME: &'static str = "echo";

  pub fn new(ctx: AgentContext) -> Self {
    Self { ctx }
  }
}

#[async_trait]
impl Agent for EchoAgent {
  async fn run(&self, inputs: Payload) -> Result<Payload, AgentError> {
    let mut result = Payload::new();
    result.insert("echo".to_string(), Value::Object(inputs));
    result.insert("params".to_string(), Value::Object(self.ctx.params.clone()));
    Ok(result)
  }
}
