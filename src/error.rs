// src/error.rs

//! Error types for dependency resolution

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving an installation set
#[derive(Error, Debug)]
pub enum Error {
    /// A query could not be resolved to a manifest
    #[error("couldn't find manifest for '{query}'{}", not_found_suffix(.bucket.as_deref(), .missing_bucket.as_deref()))]
    ManifestNotFound {
        query: String,
        bucket: Option<String>,
        /// Set when `bucket` is not registered locally
        missing_bucket: Option<String>,
    },

    /// A dependency chain revisits a node that is still being expanded
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency {
        application: String,
        dependency: String,
        cycle: Vec<String>,
    },

    /// The dependency chain below an application is deeper than the resolver allows
    #[error("dependency chain of '{application}' exceeds the depth limit of {limit}")]
    DependencyTooDeep { application: String, limit: usize },

    /// A requested application was already queued as a dependency of another request
    #[error("dependency entry for '{application}' resolves to the requested application itself")]
    DependencyResolvesToSelf { application: String },

    #[error("invalid application query: {0}")]
    InvalidQuery(String),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

fn not_found_suffix(bucket: Option<&str>, missing_bucket: Option<&str>) -> String {
    let mut suffix = String::new();
    if let Some(bucket) = bucket {
        suffix.push_str(&format!(" from '{}' bucket", bucket));
    }
    if let Some(missing) = missing_bucket {
        suffix.push_str(&format!(
            " (bucket '{}' is not added, add it with 'scoop bucket add {}')",
            missing, missing
        ));
    }
    suffix
}
