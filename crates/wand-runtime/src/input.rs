//! `${node.key}` reference resolution.
//!
//! Only top-level string inputs are scanned. Each placeholder is replaced by
//! the textual form of `context[node][key]`:
//!
//! ```json
//! { "greeting": "total is ${sum_node.sum}", "numbers": [1, 2, 3] }
//! ```
//!
//! resolves to `{ "greeting": "total is 6", "numbers": [1, 2, 3] }`.
//!
//! Broken references never fail the node; they become sentinel text:
//! - `<missing:node>` when the node has no entry
//! - `<missing_key:key>` when the node's result has no such key
//! - `<badctx:node>` when the node's entry is not a map

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use wand_config::Payload;

use crate::context::RunContext;

/// `${<node_id>.<key>}`, both parts `[A-Za-z0-9_-]+`.
static REFERENCE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_-]+)\.([A-Za-z0-9_-]+)\}").unwrap());

/// Resolve every top-level string input against the run context.
///
/// Non-string values are copied through unchanged, including strings nested
/// inside lists or maps.
pub fn resolve_inputs(inputs: &Payload, context: &RunContext) -> Payload {
  inputs
    .iter()
    .map(|(key, value)| {
      let resolved = match value {
        Value::String(template) => Value::String(resolve_str(template, context).into_owned()),
        other => other.clone(),
      };
      (key.clone(), resolved)
    })
    .collect()
}

/// Substitute all placeholders in a single string.
///
/// Returns the input unchanged (borrowed) when it holds no placeholder.
pub fn resolve_str<'a>(template: &'a str, context: &RunContext) -> Cow<'a, str> {
  REFERENCE_RE.replace_all(template, |caps: &Captures| {
    resolve_reference(&caps[1], &caps[2], context)
  })
}

fn resolve_reference(node_id: &str, key: &str, context: &RunContext) -> String {
  match context.get(node_id) {
    None => format!("<missing:{}>", node_id),
    Some(Value::Object(result)) => match result.get(key) {
      Some(value) => render(value),
      None => format!("<missing_key:{}>", key),
    },
    Some(_) => format!("<badctx:{}>", node_id),
  }
}

/// Strings are inserted verbatim; everything else as JSON text.
fn render(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
