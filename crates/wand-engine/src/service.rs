use std::sync::Arc;

use tracing::{error, info, instrument};
use wand_config::RunRequest;
use wand_registry::Registry;
use wand_runtime::{ExecutionNotifier, NoopNotifier, Orchestrator, OrchestratorConfig, RetryPolicy};
use wand_store::{RunRecord, RunStore};

use crate::error::EngineError;

/// Executes run requests and records their outcomes.
///
/// Each run gets its own orchestrator sized by the request's concurrency,
/// so concurrent runs never share a concurrency cap.
pub struct RunService<N: ExecutionNotifier + Clone = NoopNotifier> {
  registry: Arc<Registry>,
  store: Arc<dyn RunStore>,
  retry: RetryPolicy,
  notifier: N,
}

impl RunService<NoopNotifier> {
  pub fn new(registry: Arc<Registry>, store: Arc<dyn RunStore>) -> Self {
    Self::with_notifier(registry, store, NoopNotifier)
  }
}

impl<N: ExecutionNotifier + Clone> RunService<N> {
  /// Create a service whose runs report to `notifier`.
  pub fn with_notifier(registry: Arc<Registry>, store: Arc<dyn RunStore>, notifier: N) -> Self {
    Self {
      registry,
      store,
      retry: RetryPolicy::default(),
      notifier,
    }
  }

  /// Override the backoff used between node attempts.
  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Run a request to completion under a new run id.
  ///
  /// The returned record is `succeeded` with one entry per node, or `failed`
  /// with the reason the graph was rejected.
  #[instrument(name = "run_service_execute", skip(self, request), fields(run_id))]
  pub async fn execute(&self, request: RunRequest) -> Result<RunRecord, EngineError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    tracing::Span::current().record("run_id", run_id.as_str());

    let mut record = RunRecord::running(&run_id);
    self.store.create(&record).await?;
    info!(concurrency = request.concurrency, "run_submitted");

    let config = OrchestratorConfig {
      concurrency: request.concurrency,
      retry: self.retry,
    };
    let outcome = match Orchestrator::with_notifier(self.registry.clone(), config, self.notifier.clone())
    {
      Ok(orchestrator) => orchestrator.execute(&run_id, request.graph).await,
      Err(e) => Err(e),
    };

    match outcome {
      Ok(context) => {
        record.succeed(context.into_inner().into_iter().collect());
        info!(status = %record.status, "run_recorded");
      }
      Err(e) => {
        error!(error = %e, "run_failed");
        record.fail(e.to_string());
      }
    }

    self.store.update(&record).await?;
    Ok(record)
  }

  /// Look up a run by id.
  pub async fn get(&self, run_id: &str) -> Result<RunRecord, EngineError> {
    Ok(self.store.get(run_id).await?)
  }

  /// All recorded runs, oldest first.
  pub async fn list(&self) -> Result<Vec<RunRecord>, EngineError> {
    Ok(self.store.list().await?)
  }
}
