//! End-to-end orchestrator tests.
//!
//! These run on a paused clock, so sleeps, backoff and timeouts are
//! deterministic and instant.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;
use wand_agents::{Agent, AgentContext, AgentError};
use wand_config::{EdgeSpec, GraphSpec, NodeSpec, Payload};
use wand_registry::Registry;
use wand_runtime::{
  ChannelNotifier, ExecutionEvent, Orchestrator, OrchestratorConfig, RuntimeError,
};

#[derive(Debug, Clone)]
struct Call {
  label: String,
  inputs: Payload,
  start: Instant,
  end: Instant,
}

/// Shared log of every probe invocation.
#[derive(Clone, Default)]
struct Probe {
  calls: Arc<Mutex<Vec<Call>>>,
}

impl Probe {
  fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  fn calls_for(&self, label: &str) -> Vec<Call> {
    self.calls().into_iter().filter(|c| c.label == label).collect()
  }
}

/// Test agent driven entirely by its params:
/// `label`, `sleep_ms`, `fail_times`, `always_fail`, `panic`, `output`.
struct ProbeAgent {
  params: Payload,
  probe: Probe,
}

#[async_trait]
impl Agent for ProbeAgent {
  async fn run(&self, inputs: Payload) -> Result<Payload, AgentError> {
    let label = self.params["label"].as_str().unwrap_or_default().to_string();
    let start = Instant::now();

    let previous = self.probe.calls_for(&label).len() as u64;

    if let Some(ms) = self.params.get("sleep_ms").and_then(Value::as_u64) {
      tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    self.probe.calls.lock().unwrap().push(Call {
      label: label.clone(),
      inputs: inputs.clone(),
      start,
      end: Instant::now(),
    });

    if self.params.get("panic").and_then(Value::as_bool) == Some(true) {
      panic!("probe {} panicked", label);
    }
    if self.params.get("always_fail").and_then(Value::as_bool) == Some(true) {
      return Err(AgentError::Failed(format!("{} always fails", label)));
    }
    let fail_times = self.params.get("fail_times").and_then(Value::as_u64).unwrap_or(0);
    if previous < fail_times {
      return Err(AgentError::Failed(format!("{} flaked", label)));
    }

    let output = self
      .params
      .get("output")
      .and_then(Value::as_object)
      .cloned()
      .unwrap_or_else(|| inputs.clone());
    Ok(output)
  }
}

fn registry(probe: &Probe) -> Arc<Registry> {
  let mut registry = Registry::builtin();
  let probe = probe.clone();
  registry.register_agent("probe", move |ctx: AgentContext| {
    Box::new(ProbeAgent {
      params: ctx.params,
      probe: probe.clone(),
    })
  });
  Arc::new(registry)
}

fn probe_node(id: &str, params: Value) -> NodeSpec {
  let mut node = NodeSpec::new(id, "probe");
  node.agent.params = params.as_object().cloned().unwrap_or_default();
  node.agent.params.insert("label".into(), json!(id));
  node
}

fn orchestrator(probe: &Probe, concurrency: usize) -> Orchestrator {
  Orchestrator::new(registry(probe), OrchestratorConfig::with_concurrency(concurrency)).unwrap()
}

fn max_overlap(calls: &[Call]) -> usize {
  calls
    .iter()
    .map(|c| {
      calls
        .iter()
        .filter(|o| o.start <= c.start && c.start < o.end)
        .count()
    })
    .max()
    .unwrap_or(0)
}

#[tokio::test(start_paused = true)]
async fn test_every_node_gets_exactly_one_entry() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("a", json!({ "output": { "x": 1 } })),
      probe_node("b", json!({})),
      probe_node("lonely", json!({})),
    ],
    vec![EdgeSpec::new("a", "b")],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  assert_eq!(context.len(), 3);
  assert_eq!(context.get("a"), Some(&json!({ "x": 1 })));
  assert!(context.contains("b"));
  assert!(context.contains("lonely"));
  assert_eq!(probe.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_empty_graph_yields_empty_context() {
  let probe = Probe::default();
  let context = orchestrator(&probe, 4)
    .run_graph(GraphSpec::default())
    .await
    .unwrap();
  assert!(context.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cycle_is_rejected_before_anything_runs() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("a", json!({})),
      probe_node("b", json!({})),
      probe_node("c", json!({})),
    ],
    vec![
      EdgeSpec::new("a", "b"),
      EdgeSpec::new("b", "c"),
      EdgeSpec::new("c", "a"),
    ],
  );

  let result = orchestrator(&probe, 4).run_graph(graph).await;

  assert!(matches!(result, Err(RuntimeError::InvalidGraph(_))));
  assert!(probe.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dangling_edge_is_rejected() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![probe_node("a", json!({}))],
    vec![EdgeSpec::new("a", "ghost")],
  );

  let err = orchestrator(&probe, 4).run_graph(graph).await.unwrap_err();

  assert!(err.to_string().contains("ghost"));
  assert!(probe.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_references_resolve_against_upstream_results() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("a", json!({ "output": { "x": 5 } })),
      probe_node("b", json!({}))
        .with_input("value", json!("${a.x}"))
        .with_input("unknown", json!("${z.v}"))
        .with_input("absent", json!("${a.nope}"))
        .with_input("literal", json!(7)),
    ],
    vec![EdgeSpec::new("a", "b")],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  let b = context.get("b").unwrap();
  assert_eq!(b["value"], json!("5"));
  assert_eq!(b["unknown"], json!("<missing:z>"));
  assert_eq!(b["absent"], json!("<missing_key:nope>"));
  assert_eq!(b["literal"], json!(7));
}

#[tokio::test(start_paused = true)]
async fn test_reference_to_failed_node_sees_error_entry() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("a", json!({ "always_fail": true })).with_max_retries(1),
      probe_node("b", json!({})).with_input("reason", json!("${a.error}")),
    ],
    vec![EdgeSpec::new("a", "b")],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  let reason = context.get("b").unwrap()["reason"].as_str().unwrap();
  assert!(reason.contains("a always fails"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_node_does_not_abort_siblings() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("bad", json!({ "always_fail": true })).with_max_retries(2),
      probe_node("good", json!({ "output": { "ok": true } })),
    ],
    vec![],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  assert_eq!(probe.calls_for("bad").len(), 2);
  assert!(context.is_error("bad"));
  let error = context.get("bad").unwrap()["error"].as_str().unwrap();
  assert!(error.contains("2 attempt(s)"));
  assert_eq!(context.get("good"), Some(&json!({ "ok": true })));
}

#[tokio::test(start_paused = true)]
async fn test_flaky_node_succeeds_after_backoff() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("flaky", json!({ "fail_times": 1, "output": { "done": true } }))
        .with_max_retries(3),
    ],
    vec![],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  assert_eq!(context.get("flaky"), Some(&json!({ "done": true })));
  let calls = probe.calls_for("flaky");
  assert_eq!(calls.len(), 2);
  assert!(calls[1].start - calls[0].end >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_still_attempts_once() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![probe_node("a", json!({ "always_fail": true })).with_max_retries(0)],
    vec![],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  assert_eq!(probe.calls_for("a").len(), 1);
  assert!(context.is_error("a"));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_becomes_error_entry() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("slow", json!({ "sleep_ms": 5_000 }))
        .with_timeout_seconds(1)
        .with_max_retries(1),
    ],
    vec![],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  let error = context.get("slow").unwrap()["error"].as_str().unwrap();
  assert!(error.contains("timed out"));
  // The attempt was cancelled before it could log its call.
  assert!(probe.calls_for("slow").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_agent_is_not_retried() {
  let probe = Probe::default();
  let (notifier, mut events) = ChannelNotifier::channel();
  let orchestrator =
    Orchestrator::with_notifier(registry(&probe), OrchestratorConfig::default(), notifier).unwrap();
  let graph = GraphSpec::new(
    vec![NodeSpec::new("x", "no_such_agent").with_max_retries(5)],
    vec![],
  );

  let context = orchestrator.run_graph(graph).await.unwrap();

  let error = context.get("x").unwrap()["error"].as_str().unwrap();
  assert!(error.contains("no_such_agent"));
  assert!(error.contains("1 attempt(s)"));

  let mut attempts = 0;
  while let Ok(event) = events.try_recv() {
    match event {
      ExecutionEvent::AttemptStarted { .. } => attempts += 1,
      ExecutionEvent::NodeRetrying { .. } => panic!("unknown agent was retried"),
      _ => {}
    }
  }
  assert_eq!(attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_one_serializes_nodes() {
  let probe = Probe::default();
  let nodes = (0..4)
    .map(|i| probe_node(&format!("n{}", i), json!({ "sleep_ms": 100 })))
    .collect();

  orchestrator(&probe, 1)
    .run_graph(GraphSpec::new(nodes, vec![]))
    .await
    .unwrap();

  assert_eq!(probe.calls().len(), 4);
  assert_eq!(max_overlap(&probe.calls()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slot_is_held_through_retry_backoff() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("flaky", json!({ "fail_times": 1, "sleep_ms": 100 })).with_max_retries(2),
      probe_node("sibling", json!({ "sleep_ms": 100 })),
    ],
    vec![],
  );

  let context = orchestrator(&probe, 1).run_graph(graph).await.unwrap();

  assert!(!context.is_error("flaky"));
  let flaky = probe.calls_for("flaky");
  let sibling = probe.calls_for("sibling");
  assert_eq!(flaky.len(), 2);
  assert_eq!(sibling.len(), 1);

  // Whichever node got the slot first, the other never ran inside its
  // attempt sequence, backoff included.
  let (flaky_start, flaky_end) = (flaky[0].start, flaky[1].end);
  let sibling = &sibling[0];
  assert!(sibling.end <= flaky_start || sibling.start >= flaky_end);
  assert_eq!(max_overlap(&probe.calls()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_caps_nodes_in_flight() {
  let probe = Probe::default();
  let nodes = (0..4)
    .map(|i| probe_node(&format!("n{}", i), json!({ "sleep_ms": 100 })))
    .collect();

  orchestrator(&probe, 2)
    .run_graph(GraphSpec::new(nodes, vec![]))
    .await
    .unwrap();

  assert_eq!(max_overlap(&probe.calls()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_next_layer_waits_for_retries_in_previous_layer() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("a", json!({ "fail_times": 1 })).with_max_retries(2),
      probe_node("b", json!({})),
      probe_node("c", json!({})),
    ],
    vec![EdgeSpec::new("b", "c")],
  );

  orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  // c depends only on b, but still runs after a's second attempt.
  let a_last = probe.calls_for("a").last().unwrap().end;
  let c_start = probe.calls_for("c")[0].start;
  assert!(c_start >= a_last);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_agent_is_recorded_as_error() {
  let probe = Probe::default();
  let graph = GraphSpec::new(
    vec![
      probe_node("boom", json!({ "panic": true })).with_max_retries(1),
      probe_node("fine", json!({})),
    ],
    vec![],
  );

  let context = orchestrator(&probe, 4).run_graph(graph).await.unwrap();

  assert!(context.is_error("boom"));
  assert!(!context.is_error("fine"));
}

#[tokio::test(start_paused = true)]
async fn test_echo_then_sum_with_builtin_agents() {
  let graph: GraphSpec = serde_json::from_value(json!({
    "nodes": [
      { "id": "total", "agent": { "name": "sum" }, "inputs": { "numbers": [1, 2, 3] } },
      { "id": "say", "agent": { "name": "echo" }, "inputs": { "msg": "total=${total.sum}" } }
    ],
    "edges": [{ "source": "total", "target": "say" }]
  }))
  .unwrap();

  let context = orchestrator(&Probe::default(), 4)
    .run_graph(graph)
    .await
    .unwrap();

  assert_eq!(context.get("total").unwrap()["sum"], json!(6));
  assert_eq!(context.get("say").unwrap()["echo"], json!({ "msg": "total=6" }));
}

#[tokio::test(start_paused = true)]
async fn test_oversized_tool_timeout_does_not_panic_the_node() {
  let graph: GraphSpec = serde_json::from_value(json!({
    "nodes": [{
      "id": "fetch",
      "agent": {
        "name": "http_get",
        "tools": [{ "name": "data_fetcher", "config": { "timeout": 1e300 } }]
      },
      "max_retries": 3
    }]
  }))
  .unwrap();

  let context = orchestrator(&Probe::default(), 4)
    .run_graph(graph)
    .await
    .unwrap();

  let entry = context.get("fetch").unwrap();
  assert_eq!(entry["error"], json!("missing input: url"));
}

#[test]
fn test_zero_concurrency_is_rejected() {
  let result = Orchestrator::new(
    Arc::new(Registry::builtin()),
    OrchestratorConfig::with_concurrency(0),
  );
  assert!(matches!(result, Err(RuntimeError::InvalidConfig { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_events_bracket_the_run() {
  let probe = Probe::default();
  let (notifier, mut events) = ChannelNotifier::channel();
  let orchestrator =
    Orchestrator::with_notifier(registry(&probe), OrchestratorConfig::default(), notifier).unwrap();
  let graph = GraphSpec::new(
    vec![probe_node("a", json!({})), probe_node("b", json!({}))],
    vec![EdgeSpec::new("a", "b")],
  );

  orchestrator.run_graph(graph).await.unwrap();

  let mut received = Vec::new();
  while let Ok(event) = events.try_recv() {
    received.push(event);
  }

  assert!(matches!(
    received.first(),
    Some(ExecutionEvent::RunStarted { nodes: 2, layers: 2, .. })
  ));
  assert!(matches!(
    received.last(),
    Some(ExecutionEvent::RunCompleted { succeeded: 2, failed: 0, .. })
  ));
  let layers = received
    .iter()
    .filter(|e| matches!(e, ExecutionEvent::LayerStarted { .. }))
    .count();
  assert_eq!(layers, 2);
}
