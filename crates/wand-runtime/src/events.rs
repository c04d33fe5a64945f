//! Execution events and notifiers for observability.
//!
//! Events are emitted during a run to allow consumers to observe progress,
//! persist state, stream to UIs, etc.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// The graph validated and execution is starting.
  RunStarted {
    run_id: String,
    nodes: usize,
    layers: usize,
  },

  /// A layer's tasks are about to be spawned.
  LayerStarted {
    run_id: String,
    index: usize,
    node_ids: Vec<String>,
  },

  /// A node acquired its concurrency slot.
  NodeStarted { run_id: String, node_id: String },

  /// A node attempt is about to invoke its agent.
  AttemptStarted {
    run_id: String,
    node_id: String,
    attempt: u32,
  },

  /// A node attempt failed.
  AttemptFailed {
    run_id: String,
    node_id: String,
    attempt: u32,
    error: String,
  },

  /// A node is backing off before its next attempt.
  NodeRetrying {
    run_id: String,
    node_id: String,
    attempt: u32,
    delay_ms: u64,
  },

  /// A node finished successfully.
  NodeSucceeded {
    run_id: String,
    node_id: String,
    attempts: u32,
    output: serde_json::Value,
  },

  /// A node failed permanently.
  NodeFailed {
    run_id: String,
    node_id: String,
    attempts: u32,
    error: String,
  },

  /// Every node reached a terminal state.
  RunCompleted {
    run_id: String,
    succeeded: usize,
    failed: usize,
  },

  /// The run was rejected before any node executed.
  RunFailed { run_id: String, error: String },
}

/// Trait for receiving execution events.
///
/// The runtime calls `notify` for each event from whichever task produced
/// it - implementations decide what to do with them.
pub trait ExecutionNotifier: Send + Sync + 'static {
  /// Called when an execution event occurs.
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Sending never blocks a node task.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExecutionEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
