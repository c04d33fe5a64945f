//! Layered graph scheduling.
//!
//! The [`Orchestrator`] validates a graph, then runs it one layer at a time.
//! Every node in a layer runs as its own task; the next layer starts only
//! after all of them have reached a terminal state.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};
use wand_config::{DEFAULT_CONCURRENCY, GraphSpec};
use wand_registry::Registry;
use wand_workflow::Workflow;

use crate::context::RunContext;
use crate::error::{NodeError, RuntimeError};
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::executor::NodeExecutor;
use crate::result::{NodeOutcome, failure_entry};
use crate::retry::RetryPolicy;

/// Handle for a spawned node task.
type NodeHandle = tokio::task::JoinHandle<NodeOutcome>;

/// Configuration for the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
  /// Maximum number of nodes executing at once, across all layers.
  pub concurrency: usize,
  /// Backoff between node attempts.
  pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
  fn default() -> Self {
    Self {
      concurrency: DEFAULT_CONCURRENCY,
      retry: RetryPolicy::default(),
    }
  }
}

impl OrchestratorConfig {
  pub fn with_concurrency(concurrency: usize) -> Self {
    Self {
      concurrency,
      ..Self::default()
    }
  }
}

/// Drives graph runs.
///
/// The concurrency limiter is the only state an orchestrator holds. Runs
/// started concurrently on one instance share that cap and nothing else;
/// they are not otherwise isolated from each other.
///
/// Generic over `N: ExecutionNotifier` to allow different notification
/// strategies. Use `Orchestrator::new()` for no-op notifications or
/// `Orchestrator::with_notifier()` to observe events.
pub struct Orchestrator<N: ExecutionNotifier = NoopNotifier> {
  registry: Arc<Registry>,
  limiter: Arc<Semaphore>,
  config: OrchestratorConfig,
  notifier: Arc<N>,
}

impl Orchestrator<NoopNotifier> {
  /// Create an orchestrator with no-op notifications.
  pub fn new(registry: Arc<Registry>, config: OrchestratorConfig) -> Result<Self, RuntimeError> {
    Self::with_notifier(registry, config, NoopNotifier)
  }
}

impl<N: ExecutionNotifier> Orchestrator<N> {
  /// Create an orchestrator with a custom notifier.
  pub fn with_notifier(
    registry: Arc<Registry>,
    config: OrchestratorConfig,
    notifier: N,
  ) -> Result<Self, RuntimeError> {
    if config.concurrency == 0 {
      return Err(RuntimeError::InvalidConfig {
        message: "concurrency must be at least 1".to_string(),
      });
    }

    Ok(Self {
      registry,
      limiter: Arc::new(Semaphore::new(config.concurrency)),
      config,
      notifier: Arc::new(notifier),
    })
  }

  pub fn config(&self) -> &OrchestratorConfig {
    &self.config
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Run a graph under a freshly generated run id.
  pub async fn run_graph(&self, spec: GraphSpec) -> Result<RunContext, RuntimeError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    self.execute(&run_id, spec).await
  }

  /// Run a graph to completion.
  ///
  /// Returns once every node has reached a terminal state, with one context
  /// entry per node. Fails only if the graph is invalid, in which case no
  /// node has executed.
  #[instrument(name = "run_graph", skip(self, spec), fields(run_id = %run_id))]
  pub async fn execute(&self, run_id: &str, spec: GraphSpec) -> Result<RunContext, RuntimeError> {
    let workflow = match Workflow::from_spec(spec) {
      Ok(workflow) => workflow,
      Err(e) => {
        let e = RuntimeError::from(e);
        error!(error = %e, "run_rejected");
        self.notifier.notify(ExecutionEvent::RunFailed {
          run_id: run_id.to_string(),
          error: e.to_string(),
        });
        return Err(e);
      }
    };

    info!(
      nodes = workflow.len(),
      layers = workflow.layers().len(),
      concurrency = self.config.concurrency,
      "run_started"
    );
    self.notifier.notify(ExecutionEvent::RunStarted {
      run_id: run_id.to_string(),
      nodes: workflow.len(),
      layers: workflow.layers().len(),
    });

    let mut context = RunContext::new();
    for (index, layer) in workflow.layers().iter().enumerate() {
      self.run_layer(run_id, &workflow, index, layer, &mut context).await;
    }

    let failed = context.iter().filter(|(id, _)| context.is_error(id)).count();
    let succeeded = context.len() - failed;

    info!(succeeded, failed, "run_completed");
    self.notifier.notify(ExecutionEvent::RunCompleted {
      run_id: run_id.to_string(),
      succeeded,
      failed,
    });

    Ok(context)
  }

  /// Run every node of one layer and record all of their outcomes.
  async fn run_layer(
    &self,
    run_id: &str,
    workflow: &Workflow,
    index: usize,
    layer: &[String],
    context: &mut RunContext,
  ) {
    info!(layer = index, nodes = ?layer, "layer_started");
    self.notifier.notify(ExecutionEvent::LayerStarted {
      run_id: run_id.to_string(),
      index,
      node_ids: layer.to_vec(),
    });

    // Every earlier layer is complete, so this snapshot holds an entry for
    // each node the layer could depend on.
    let snapshot = Arc::new(context.clone());

    let mut node_ids = Vec::with_capacity(layer.len());
    let mut handles: Vec<NodeHandle> = Vec::with_capacity(layer.len());

    // Layers only hold ids of nodes in this workflow.
    for node in layer.iter().filter_map(|id| workflow.get_node(id)) {
      let node = node.clone();
      let run_id = run_id.to_string();
      let snapshot = snapshot.clone();
      let limiter = self.limiter.clone();
      let notifier = self.notifier.clone();
      let executor = NodeExecutor::new(self.registry.clone(), self.config.retry, notifier.clone());

      node_ids.push(node.id.clone());
      handles.push(tokio::spawn(async move {
        // Held across the node's whole attempt sequence, backoff included.
        let Ok(_permit) = limiter.acquire_owned().await else {
          return NodeOutcome::Failed {
            error: NodeError::Runtime {
              message: "concurrency limiter closed".to_string(),
            },
            attempts: 0,
          };
        };

        notifier.notify(ExecutionEvent::NodeStarted {
          run_id: run_id.clone(),
          node_id: node.id.clone(),
        });

        executor.execute(&run_id, &node, &snapshot).await
      }));
    }

    let results = futures::future::join_all(handles).await;

    for (node_id, result) in node_ids.into_iter().zip(results) {
      let entry = match result {
        Ok(outcome) => {
          self.report(run_id, &node_id, &outcome);
          outcome.to_entry()
        }
        Err(e) => {
          error!(node_id = %node_id, error = %e, "node_task_panicked");
          let message = format!("node task panicked: {}", e);
          self.notifier.notify(ExecutionEvent::NodeFailed {
            run_id: run_id.to_string(),
            node_id: node_id.clone(),
            attempts: 0,
            error: message.clone(),
          });
          failure_entry(message)
        }
      };

      if !context.record(node_id.clone(), entry) {
        warn!(node_id = %node_id, "node already recorded, keeping first entry");
      }
    }
  }

  fn report(&self, run_id: &str, node_id: &str, outcome: &NodeOutcome) {
    match outcome {
      NodeOutcome::Succeeded { output, attempts } => {
        info!(node_id = %node_id, attempts, "node_succeeded");
        self.notifier.notify(ExecutionEvent::NodeSucceeded {
          run_id: run_id.to_string(),
          node_id: node_id.to_string(),
          attempts: *attempts,
          output: serde_json::Value::Object(output.clone()),
        });
      }
      NodeOutcome::Failed { error, attempts } => {
        error!(node_id = %node_id, attempts, error = %error, "node_failed");
        self.notifier.notify(ExecutionEvent::NodeFailed {
          run_id: run_id.to_string(),
          node_id: node_id.to_string(),
          attempts: *attempts,
          error: error.to_string(),
        });
      }
    }
  }
}
