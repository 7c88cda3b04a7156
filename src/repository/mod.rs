// src/repository/mod.rs

//! Manifest lookup
//!
//! Resolution never touches the filesystem directly; it asks a
//! [`ManifestSource`] to turn a query into a [`ManifestInformation`].
//! Two sources are provided: [`BucketDirectory`] reads bucket checkouts from
//! disk and [`MemorySource`] holds manifests in memory.

mod bucket;

pub use bucket::BucketDirectory;

use crate::error::Error;
use crate::manifest::{AppQuery, Manifest, ManifestInformation};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the bucket searched first for unqualified queries
pub const MAIN_BUCKET: &str = "main";

/// Resolves application queries into manifests
pub trait ManifestSource {
    /// Look up `query` (`[bucket/]name[@version]`)
    ///
    /// Absence is reported as a `ManifestInformation` without a manifest,
    /// not as an error.
    fn lookup(&self, query: &str) -> ManifestInformation;

    /// Buckets currently registered locally
    fn local_buckets(&self) -> BTreeSet<String>;

    /// `ManifestNotFound` for a failed lookup, naming its bucket when that
    /// bucket is not registered locally
    fn not_found_error(&self, info: &ManifestInformation) -> Error {
        let missing_bucket = info
            .bucket
            .as_ref()
            .filter(|bucket| !self.local_buckets().contains(*bucket))
            .cloned();
        Error::ManifestNotFound {
            query: info.original_query.clone(),
            bucket: info.bucket.clone(),
            missing_bucket,
        }
    }
}

/// Bucket search order for unqualified queries: `main` first, then by name
pub(crate) fn search_order(buckets: &BTreeSet<String>) -> Vec<&str> {
    let mut order: Vec<&str> = Vec::with_capacity(buckets.len());
    if buckets.contains(MAIN_BUCKET) {
        order.push(MAIN_BUCKET);
    }
    order.extend(
        buckets
            .iter()
            .map(String::as_str)
            .filter(|b| *b != MAIN_BUCKET),
    );
    order
}

/// Whether a found manifest satisfies the version part of a query
pub(crate) fn version_matches(query: &AppQuery, manifest: &Manifest) -> bool {
    match query.version {
        Some(ref wanted) => manifest.version == *wanted,
        None => true,
    }
}

/// In-memory manifest source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    /// bucket -> app name -> manifest
    buckets: BTreeMap<String, BTreeMap<String, Manifest>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty bucket
    pub fn add_bucket(&mut self, bucket: impl Into<String>) {
        self.buckets.entry(bucket.into()).or_default();
    }

    /// Add (or replace) a manifest, registering its bucket if needed
    pub fn insert(&mut self, bucket: impl Into<String>, name: impl Into<String>, manifest: Manifest) {
        self.buckets
            .entry(bucket.into())
            .or_default()
            .insert(name.into(), manifest);
    }

    /// Builder-style [`MemorySource::insert`]
    pub fn with(mut self, bucket: &str, name: &str, manifest: Manifest) -> Self {
        self.insert(bucket, name, manifest);
        self
    }

    fn find(&self, bucket: &str, query: &AppQuery) -> Option<&Manifest> {
        self.buckets
            .get(bucket)?
            .get(&query.name)
            .filter(|manifest| version_matches(query, manifest))
    }
}

impl ManifestSource for MemorySource {
    fn lookup(&self, query: &str) -> ManifestInformation {
        let Ok(parsed) = AppQuery::parse(query) else {
            return ManifestInformation::missing(query);
        };

        let found = match parsed.bucket {
            Some(ref bucket) => self.find(bucket, &parsed).map(|m| (bucket.clone(), m)),
            None => {
                let buckets = self.local_buckets();
                search_order(&buckets)
                    .into_iter()
                    .find_map(|bucket| self.find(bucket, &parsed).map(|m| (bucket.to_string(), m)))
            }
        };

        match found {
            Some((bucket, manifest)) => {
                ManifestInformation::found(query, parsed.name, Some(bucket), manifest.clone())
            }
            None => ManifestInformation::missing(query),
        }
    }

    fn local_buckets(&self) -> BTreeSet<String> {
        self.buckets.keys().cloned().collect()
    }
}
