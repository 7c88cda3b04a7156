// src/lib.rs

//! Scoop dependency resolution
//!
//! Computes installation queues for Scoop-style application manifests:
//! which applications, and in what order, must be installed so that every
//! requested application has its declared dependencies and the extraction
//! helpers its downloads need.
//!
//! # Architecture
//!
//! - Manifests: JSON documents in bucket checkouts, parsed once into a schema
//! - Helpers: extraction tools detected from download URLs and install scripts
//! - Resolver: iterative depth-first walk with cycle and depth guards
//! - Queue: per-request closures merged with cross-request deduplication

pub mod config;
mod error;
pub mod helpers;
pub mod manifest;
pub mod repository;
pub mod resolver;
pub mod version;

pub use config::{Config, HelperConfig};
pub use error::{Error, Result};
pub use helpers::{Helper, HelperDetector, HelperProbe};
pub use manifest::{AppQuery, Architecture, Manifest, ManifestInformation};
pub use repository::{BucketDirectory, ManifestSource, MemorySource};
pub use resolver::{
    DependencyExtractor, DependencyResolver, InstallQueue, InstallQueueBuilder, QueueFailure,
    VersionNote,
};
pub use version::{ManifestVersion, compare_versions};
