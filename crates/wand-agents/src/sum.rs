use async_trait::async_trait;
use serde_json::{Value, json};
use wand_config::Payload;

use crate::{Agent, AgentContext, AgentError, error_result};

/// Adds up the `numbers` input.
///
/// The sum is an integer when every element is an integer, a float otherwise.
#[derive(Debug)]
pub struct SumAgent {
  ctx: AgentContext,
}

impl SumAgent {
  pub const NAME: &'static str = "sum";

  pub fn new(ctx: AgentContext) -> Self {
    Self { ctx }
  }
}

#[async_trait]
impl Agent for SumAgent {
  async fn run(&self, inputs: Payload) -> Result<Payload, AgentError> {
    let numbers = match inputs.get("numbers") {
      None | Some(Value::Null) => return Ok(error_result("no numbers provided")),
      Some(Value::Array(items)) if items.is_empty() => {
        return Ok(error_result("no numbers provided"));
      }
      Some(Value::Array(items)) => items,
      Some(other) => {
        return Ok(error_result(format!(
          "sum failed: expected a list of numbers, got {}",
          other
        )));
      }
    };

    let total = match add(numbers) {
      Ok(total) => total,
      Err(message) => return Ok(error_result(format!("sum failed: {}", message))),
    };

    let mut result = Payload::new();
    result.insert("sum".to_string(), total);
    result.insert("params".to_string(), Value::Object(self.ctx.params.clone()));
    Ok(result)
  }
}

fn add(numbers: &[Value]) -> Result<Value, String> {
  let mut int_total: Option<i64> = Some(0);
  let mut float_total = 0.0_f64;

  for value in numbers {
    let Value::Number(n) = value else {
      return Err(format!("non-numeric value {}", value));
    };
    int_total = match (int_total, n.as_i64()) {
      (Some(acc), Some(i)) => acc.checked_add(i),
      _ => None,
    };
    float_total += n.as_f64().unwrap_or(0.0);
  }

  Ok(match int_total {
    Some(total) => json!(total),
    None => json!(float_total),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn inputs(value: Value) -> Payload {
    value.as_object().cloned().unwrap()
  }

  fn agent() -> SumAgent {
    SumAgent::new(AgentContext::default())
  }

  #[tokio::test]
  async fn test_integer_sum() {
    let result = agent().run(inputs(json!({ "numbers": [1, 2, 3] }))).await.unwrap();
    assert_eq!(result["sum"], json!(6));
    assert_eq!(result["params"], json!({}));
  }

  #[tokio::test]
  async fn test_float_sum() {
    let result = agent().run(inputs(json!({ "numbers": [1, 2.5] }))).await.unwrap();
    assert_eq!(result["sum"], json!(3.5));
  }

  #[tokio::test]
  async fn test_missing_or_empty_numbers() {
    let result = agent().run(Payload::new()).await.unwrap();
    assert_eq!(result["error"], "no numbers provided");

    let result = agent().run(inputs(json!({ "numbers": [] }))).await.unwrap();
    assert_eq!(result["error"], "no numbers provided");
  }

  #[tokio::test]
  async fn test_non_numeric_values_are_reported() {
    let result = agent().run(inputs(json!({ "numbers": [1, "two"] }))).await.unwrap();
    assert!(result["error"].as_str().unwrap().starts_with("sum failed"));

    // An unresolved placeholder arrives as a plain string.
    let result = agent().run(inputs(json!({ "numbers": "<missing:a>" }))).await.unwrap();
    assert!(result["error"].as_str().unwrap().starts_with("sum failed"));
  }
}
