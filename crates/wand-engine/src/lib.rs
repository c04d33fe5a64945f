//! Wand Engine
//!
//! This crate ties the runtime to run storage. A [`RunService`] accepts a
//! [`RunRequest`](wand_config::RunRequest), executes its graph and keeps a
//! [`RunRecord`](wand_store::RunRecord) of the outcome.
//!
//! ```text
//! RunService::execute(request)
//!   ├─ store.create(running)
//!   ├─ Orchestrator(concurrency).run_graph(graph)
//!   │    ├─ Ok(context)  → succeeded + result
//!   │    └─ Err(error)   → failed + error
//!   └─ store.update(record)
//! ```

mod error;
mod service;

pub use error::EngineError;
pub use service::RunService;
