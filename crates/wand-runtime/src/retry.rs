//! Backoff between node attempts.

use std::time::Duration;

/// Exponential backoff: `min(base * 2^(attempt - 1), max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Delay after the first failed attempt.
  pub base_delay: Duration,
  /// Upper bound on any single delay.
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      base_delay: Duration::from_millis(500),
      max_delay: Duration::from_secs(4),
    }
  }
}

impl RetryPolicy {
  /// Delay to wait after `attempt` (1-based) has failed.
  pub fn delay(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    self
      .base_delay
      .saturating_mul(1u32 << exponent)
      .min(self.max_delay)
  }

  /// Total attempts allowed for a node's `max_retries` setting.
  ///
  /// `max_retries` is the whole attempt budget; at least one attempt runs.
  pub fn max_attempts(max_retries: u32) -> u32 {
    max_retries.max(1)
  }
}
