//! Wand Runtime
//!
//! This crate runs a validated graph to completion. It handles:
//! - Layer-by-layer scheduling with a barrier between layers
//! - A concurrency cap shared by every node of a run
//! - `${node.key}` reference resolution against earlier results
//! - Per-attempt timeouts and exponential backoff between attempts
//!
//! ```text
//! Orchestrator::run_graph(spec)
//!   ├─ Workflow::from_spec       validate + layer, nothing runs on failure
//!   └─ for each layer
//!        ├─ spawn NodeExecutor per node (each holds one limiter slot)
//!        ├─ join all                     barrier
//!        └─ record outcomes into RunContext
//! ```
//!
//! A node that fails permanently is recorded as `{"error": ...}` in the
//! [`RunContext`]; it never aborts its siblings or the run. Only graph
//! validation surfaces as an `Err` from [`Orchestrator::run_graph`].

mod context;
mod error;
mod events;
mod executor;
mod input;
mod orchestrator;
mod result;
mod retry;

pub use context::RunContext;
pub use error::{NodeError, RuntimeError};
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use executor::{NodeExecutor, NodeState};
pub use input::{resolve_inputs, resolve_str};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use result::NodeOutcome;
pub use retry::RetryPolicy;
