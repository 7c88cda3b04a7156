// src/resolver/mod.rs

//! Dependency resolution and installation queue building
//!
//! This module provides per-manifest dependency extraction, the recursive
//! dependency walk with cycle detection, and the merge of several
//! requests into one installation queue.

mod extract;
mod graph;
mod plan;
mod queue;

pub use extract::DependencyExtractor;
pub use graph::{DEFAULT_MAX_DEPTH, DependencyResolver};
pub use plan::{InstallQueue, QueueFailure, VersionNote};
pub use queue::InstallQueueBuilder;
