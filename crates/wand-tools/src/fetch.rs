use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use tracing::debug;
use wand_config::Payload;

use crate::Tool;

/// Request timeout when the tool config does not set `timeout`.
const DEFAULT_TIMEOUT_SECONDS: f64 = 10.0;

/// Fetches a URL over HTTP.
///
/// Config:
/// - `timeout`: total request timeout in seconds (default 10)
///
/// Arguments:
/// - `url` (required)
/// - `method`: "GET", "POST", ... (default "GET")
/// - `headers`: optional map of header name to string value
/// - `body`: optional JSON body
///
/// Returns `{"status", "text", "headers"}`. On any failure returns
/// `{"status": null, "text": "", "headers": {}, "error": "..."}`.
#[derive(Debug, Clone)]
pub struct DataFetcher {
  client: Client,
  timeout: Duration,
}

impl DataFetcher {
  pub const NAME: &'static str = "data_fetcher";

  pub fn new(config: &Payload) -> Self {
    let timeout = config
      .get("timeout")
      .and_then(Value::as_f64)
      .filter(|s| *s > 0.0)
      .and_then(|s| Duration::try_from_secs_f64(s).ok())
      .unwrap_or(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS));
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .unwrap_or_default();

    Self { client, timeout }
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  async fn fetch(&self, args: &Payload) -> Result<Payload, String> {
    let url = args
      .get("url")
      .and_then(Value::as_str)
      .ok_or_else(|| "missing required argument: url".to_string())?;
    let method = parse_method(args.get("method").and_then(Value::as_str).unwrap_or("GET"))?;

    let mut request = self.client.request(method, url);

    if let Some(headers) = args.get("headers").and_then(Value::as_object) {
      for (key, value) in headers {
        if let Some(value) = value.as_str() {
          request = request.header(key, value);
        }
      }
    }

    if let Some(body) = args.get("body") {
      request = request.json(body);
    }

    let response = request.send().await.map_err(|e| e.to_string())?;

    let status = response.status().as_u16();
    let headers: serde_json::Map<String, Value> = response
      .headers()
      .iter()
      .filter_map(|(k, v)| {
        v.to_str()
          .ok()
          .map(|val| (k.as_str().to_string(), Value::String(val.to_string())))
      })
      .collect();

    // Undecodable bodies degrade to an empty string rather than an error.
    let text = match response.bytes().await {
      Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
      Err(e) => {
        debug!(url = %url, error = %e, "failed to read response body");
        String::new()
      }
    };

    let mut output = Payload::new();
    output.insert("status".to_string(), json!(status));
    output.insert("text".to_string(), Value::String(text));
    output.insert("headers".to_string(), Value::Object(headers));
    Ok(output)
  }
}

#[async_trait]
impl Tool for DataFetcher {
  fn name(&self) -> &str {
    Self::NAME
  }

  async fn call(&self, args: Payload) -> Payload {
    match self.fetch(&args).await {
      Ok(output) => output,
      Err(error) => {
        debug!(error = %error, "data_fetcher request failed");
        let mut output = Payload::new();
        output.insert("status".to_string(), Value::Null);
        output.insert("text".to_string(), Value::String(String::new()));
        output.insert("headers".to_string(), Value::Object(Payload::new()));
        output.insert("error".to_string(), Value::String(error));
        output
      }
    }
  }
}

fn parse_method(method: &str) -> Result<Method, String> {
  match method.to_uppercase().as_str() {
    "GET" => Ok(Method::GET),
    "POST" => Ok(Method::POST),
    "PUT" => Ok(Method::PUT),
    "DELETE" => Ok(Method::DELETE),
    "PATCH" => Ok(Method::PATCH),
    "HEAD" => Ok(Method::HEAD),
    "OPTIONS" => Ok(Method::OPTIONS),
    _ => Err(format!("unsupported HTTP method: {}", method)),
  }
}
