//! Single-node execution: resolve, invoke, time out, retry.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, info, instrument, warn};
use wand_config::{NodeSpec, Payload};
use wand_registry::Registry;

use crate::context::RunContext;
use crate::error::NodeError;
use crate::events::{ExecutionEvent, ExecutionNotifier};
use crate::input::resolve_inputs;
use crate::result::NodeOutcome;
use crate::retry::RetryPolicy;

/// Where a node is in its lifecycle.
///
/// `Pending → ResolvingInputs → Invoking → (RetryBackoff → Invoking)* →
/// Succeeded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
  Pending,
  ResolvingInputs,
  Invoking,
  RetryBackoff,
  Succeeded,
  Failed,
}

impl NodeState {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Succeeded | Self::Failed)
  }
}

impl fmt::Display for NodeState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Pending => "pending",
      Self::ResolvingInputs => "resolving_inputs",
      Self::Invoking => "invoking",
      Self::RetryBackoff => "retry_backoff",
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
    };
    f.write_str(name)
  }
}

/// Runs one node to a terminal [`NodeOutcome`].
///
/// The executor never writes to the run context; the caller records the
/// returned outcome.
pub struct NodeExecutor<N: ExecutionNotifier> {
  registry: Arc<Registry>,
  retry: RetryPolicy,
  notifier: Arc<N>,
}

impl<N: ExecutionNotifier> NodeExecutor<N> {
  pub fn new(registry: Arc<Registry>, retry: RetryPolicy, notifier: Arc<N>) -> Self {
    Self {
      registry,
      retry,
      notifier,
    }
  }

  /// Drive `node` through its attempt sequence.
  ///
  /// Timeouts and runtime errors are retried with backoff until the node's
  /// attempt budget is spent. Unknown agent or tool names fail immediately.
  #[instrument(
    name = "node_execute",
    skip(self, node, context),
    fields(
      run_id = %run_id,
      node_id = %node.id,
      agent = %node.agent.name,
    )
  )]
  pub async fn execute(&self, run_id: &str, node: &NodeSpec, context: &RunContext) -> NodeOutcome {
    let max_attempts = RetryPolicy::max_attempts(node.max_retries);
    let mut state = NodeState::Pending;
    let mut attempt = 0;

    loop {
      attempt += 1;

      state = transition(state, NodeState::ResolvingInputs);
      let inputs = resolve_inputs(&node.inputs, context);

      state = transition(state, NodeState::Invoking);
      self.notifier.notify(ExecutionEvent::AttemptStarted {
        run_id: run_id.to_string(),
        node_id: node.id.clone(),
        attempt,
      });

      let error = match self.attempt(node, inputs).await {
        Ok(output) => {
          transition(state, NodeState::Succeeded);
          return NodeOutcome::Succeeded {
            output,
            attempts: attempt,
          };
        }
        Err(error) => error,
      };

      warn!(attempt, max_attempts, error = %error, "node_attempt_failed");
      self.notifier.notify(ExecutionEvent::AttemptFailed {
        run_id: run_id.to_string(),
        node_id: node.id.clone(),
        attempt,
        error: error.to_string(),
      });

      if !error.is_retryable() || attempt >= max_attempts {
        transition(state, NodeState::Failed);
        return NodeOutcome::Failed {
          error,
          attempts: attempt,
        };
      }

      state = transition(state, NodeState::RetryBackoff);
      let delay = self.retry.delay(attempt);
      info!(attempt, delay_ms = delay.as_millis() as u64, "node_retrying");
      self.notifier.notify(ExecutionEvent::NodeRetrying {
        run_id: run_id.to_string(),
        node_id: node.id.clone(),
        attempt,
        delay_ms: delay.as_millis() as u64,
      });
      tokio::time::sleep(delay).await;
    }
  }

  /// One attempt: build the agent and its tools, then invoke it under the
  /// node's timeout.
  async fn attempt(&self, node: &NodeSpec, inputs: Payload) -> Result<Payload, NodeError> {
    let agent = match std::panic::catch_unwind(AssertUnwindSafe(|| {
      self.registry.build_agent(&node.agent)
    })) {
      Ok(built) => built?,
      Err(panic) => {
        return Err(NodeError::Runtime {
          message: format!("agent construction panicked: {}", panic_message(panic.as_ref())),
        });
      }
    };
    let timeout = Duration::from_secs(node.timeout_seconds);

    let invocation = AssertUnwindSafe(agent.run(inputs)).catch_unwind();

    match tokio::time::timeout(timeout, invocation).await {
      Ok(Ok(Ok(output))) => Ok(output),
      Ok(Ok(Err(e))) => Err(NodeError::Runtime {
        message: e.to_string(),
      }),
      Ok(Err(panic)) => Err(NodeError::Runtime {
        message: format!("agent panicked: {}", panic_message(panic.as_ref())),
      }),
      Err(_) => Err(NodeError::Timeout {
        timeout_seconds: node.timeout_seconds,
      }),
    }
  }
}

fn transition(from: NodeState, to: NodeState) -> NodeState {
  debug!(from = %from, to = %to, "node_state");
  to
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s.to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}
