// src/resolver/plan.rs

//! Installation queue data structures
//!
//! Contains the result types for queue building.

use crate::error::Error;
use crate::manifest::ManifestInformation;
use std::fmt;

/// Result of building an installation queue
#[derive(Debug, Default)]
pub struct InstallQueue {
    /// Applications to install in order (dependencies first)
    pub entries: Vec<ManifestInformation>,
    /// Requests that could not be resolved
    pub failures: Vec<QueueFailure>,
    /// Dependencies queued at an older version than another request wanted
    pub notes: Vec<VersionNote>,
}

impl InstallQueue {
    /// True when every requested application was resolved
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn application_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.application_name.as_str())
            .collect()
    }

    /// Entries pulled in as dependencies
    pub fn dependencies(&self) -> impl Iterator<Item = &ManifestInformation> {
        self.entries.iter().filter(|e| e.is_dependency)
    }

    pub(crate) fn contains(&self, application_name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.application_name == application_name)
    }

    pub(crate) fn get(&self, application_name: &str) -> Option<&ManifestInformation> {
        self.entries
            .iter()
            .find(|e| e.application_name == application_name)
    }
}

/// A requested application that could not be queued
#[derive(Debug)]
pub struct QueueFailure {
    /// The query as it was requested
    pub query: String,
    pub error: Error,
}

impl fmt::Display for QueueFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.query, self.error)
    }
}

/// A newer version of an already queued dependency was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNote {
    pub application: String,
    /// Version kept in the queue
    pub queued: String,
    /// Newer version that was not queued
    pub candidate: String,
}

impl fmt::Display for VersionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} is queued, but version {} is also wanted",
            self.application, self.queued, self.candidate
        )
    }
}
