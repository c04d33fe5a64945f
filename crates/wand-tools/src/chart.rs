use async_trait::async_trait;
use serde_json::Value;
use wand_config::Payload;

use crate::Tool;

const PLACEHOLDER_CHART_URL: &str = "https://example.com/chart/placeholder";

/// Produces a chart reference for a series of points.
///
/// Rendering is not wired up yet; every call returns the placeholder URL
/// together with the points it was given.
#[derive(Debug, Clone, Default)]
pub struct ChartGenerator {
  config: Payload,
}

impl ChartGenerator {
  pub const NAME: &'static str = "chart_generator";

  pub fn new(config: Payload) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Payload {
    &self.config
  }
}

#[async_trait]
impl Tool for ChartGenerator {
  fn name(&self) -> &str {
    Self::NAME
  }

  async fn call(&self, args: Payload) -> Payload {
    let mut output = Payload::new();
    output.insert(
      "chart_url".to_string(),
      Value::String(PLACEHOLDER_CHART_URL.to_string()),
    );
    output.insert(
      "points".to_string(),
      args.get("data").cloned().unwrap_or(Value::Null),
    );
    output
  }
}
