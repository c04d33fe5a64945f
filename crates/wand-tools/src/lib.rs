//! Wand Tools
//!
//! Tools are auxiliary capabilities handed to agents at construction time.
//! A tool is built from its configuration map and exposes a single `call`
//! taking keyword arguments as a JSON object.
//!
//! Tools never fail: every problem is reported inside the returned map,
//! usually under an `"error"` key, so agents can use them without error
//! plumbing.

mod chart;
mod fetch;

use async_trait::async_trait;
use wand_config::Payload;

pub use chart::ChartGenerator;
pub use fetch::DataFetcher;

/// An auxiliary capability usable by agents.
#[async_trait]
pub trait Tool: Send + Sync {
  /// Registry name of the tool.
  fn name(&self) -> &str;

  /// Invoke the tool. Failures are encoded in the returned map.
  async fn call(&self, args: Payload) -> Payload;
}
