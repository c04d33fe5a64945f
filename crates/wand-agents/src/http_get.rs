use async_trait::async_trait;
use serde_json::{Value, json};
use wand_config::Payload;
use wand_tools::DataFetcher;

use crate::{Agent, AgentContext, AgentError, error_result};

/// Fetches the `url` input through the `data_fetcher` tool and summarises
/// the response as `{"status", "length", "headers"}`.
#[derive(Debug)]
pub struct HttpGetAgent {
  ctx: AgentContext,
}

impl HttpGetAgent {
  pub const NAME: &'static str = "http_get";

  pub fn new(ctx: AgentContext) -> Self {
    Self { ctx }
  }
}

#[async_trait]
impl Agent for HttpGetAgent {
  async fn run(&self, inputs: Payload) -> Result<Payload, AgentError> {
    let Some(fetcher) = self.ctx.tool(DataFetcher::NAME) else {
      return Ok(error_result("data_fetcher tool not configured"));
    };

    let Some(url) = inputs.get("url").and_then(Value::as_str) else {
      return Ok(error_result("missing input: url"));
    };

    let mut args = Payload::new();
    args.insert("url".to_string(), Value::String(url.to_string()));
    let response = fetcher.call(args).await;

    let length = response
      .get("text")
      .and_then(Value::as_str)
      .map(|text| text.chars().count())
      .unwrap_or(0);

    let mut result = Payload::new();
    result.insert(
      "status".to_string(),
      response.get("status").cloned().unwrap_or(Value::Null),
    );
    result.insert("length".to_string(), json!(length));
    result.insert(
      "headers".to_string(),
      response.get("headers").cloned().unwrap_or_else(|| json!({})),
    );
    if let Some(error) = response.get("error") {
      result.insert("error".to_string(), error.clone());
    }
    Ok(result)
  }
}
