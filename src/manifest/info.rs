// src/manifest/info.rs

//! Resolved references to applications taking part in a resolution pass

use super::{AppQuery, Manifest};

/// One application to be installed, as produced by manifest lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestInformation {
    /// Package name, unique within one installation queue
    pub application_name: String,
    /// Bucket the manifest came from, or the bucket the query asked for
    pub bucket: Option<String>,
    /// Parsed manifest, `None` when lookup failed
    pub manifest: Option<Manifest>,
    /// The query as the user or the dependent manifest wrote it
    pub original_query: String,
    pub version: Option<String>,
    /// Pulled in transitively rather than requested directly
    pub is_dependency: bool,
}

impl ManifestInformation {
    /// A successfully looked-up application
    pub fn found(
        query: impl Into<String>,
        name: impl Into<String>,
        bucket: Option<String>,
        manifest: Manifest,
    ) -> Self {
        let version = Some(manifest.version.clone()).filter(|v| !v.is_empty());
        Self {
            application_name: name.into(),
            bucket,
            manifest: Some(manifest),
            original_query: query.into(),
            version,
            is_dependency: false,
        }
    }

    /// A query whose manifest could not be found
    ///
    /// The name and bucket are taken from the query so error messages can
    /// still point at the missing bucket.
    pub fn missing(query: impl Into<String>) -> Self {
        let query = query.into();
        let (name, bucket) = match AppQuery::parse(&query) {
            Ok(parsed) => (parsed.name, parsed.bucket),
            Err(_) => (query.trim().to_string(), None),
        };
        Self {
            application_name: name,
            bucket,
            manifest: None,
            original_query: query,
            version: None,
            is_dependency: false,
        }
    }

    pub fn is_found(&self) -> bool {
        self.manifest.is_some()
    }

    /// `bucket/name`, or just the name for bucket-less entries
    pub fn qualified_name(&self) -> String {
        match &self.bucket {
            Some(bucket) => format!("{}/{}", bucket, self.application_name),
            None => self.application_name.clone(),
        }
    }
}
