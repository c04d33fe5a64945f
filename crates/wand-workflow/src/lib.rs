//! Wand Workflow
//!
//! This crate provides the validated graph representation for wand.
//! A [`Workflow`] is built from a submitted [`wand_config::GraphSpec`] and is
//! ready for execution:
//! - Node ids are unique and every edge endpoint exists
//! - The edge set is acyclic
//! - Nodes are partitioned into dependency layers (Kahn generations)
//!
//! Validation happens entirely up front, so a graph that fails here never
//! runs a single node.

mod error;
mod graph;
mod workflow;

pub use error::GraphError;
pub use graph::Graph;
pub use workflow::Workflow;
