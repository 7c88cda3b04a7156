// src/repository/bucket.rs

//! Bucket checkouts on disk
//!
//! Layout below the root directory:
//!
//! ```text
//! buckets/
//!   main/
//!     bucket/
//!       git.json
//!   legacy/
//!     oldapp.json        (flat bucket, no bucket/ subdirectory)
//! ```

use super::{ManifestSource, search_order, version_matches};
use crate::error::Result;
use crate::manifest::{AppQuery, Manifest, ManifestInformation};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manifest source backed by the `buckets/` directory of a root
#[derive(Debug, Clone)]
pub struct BucketDirectory {
    buckets_dir: PathBuf,
}

impl BucketDirectory {
    /// Use `<root>/buckets` as the bucket directory
    pub fn new(root: &Path) -> Self {
        Self {
            buckets_dir: root.join("buckets"),
        }
    }

    /// Path of the manifest for `name` in `bucket`, if one exists
    pub fn manifest_path(&self, bucket: &str, name: &str) -> Option<PathBuf> {
        let bucket_dir = self.buckets_dir.join(bucket);
        let file_name = format!("{}.json", name);

        [bucket_dir.join("bucket").join(&file_name), bucket_dir.join(&file_name)]
            .into_iter()
            .find(|path| path.is_file())
    }

    fn load(&self, bucket: &str, query: &AppQuery) -> Option<Manifest> {
        let path = self.manifest_path(bucket, &query.name)?;
        match Manifest::from_file(&path) {
            Ok(manifest) if version_matches(query, &manifest) => Some(manifest),
            Ok(manifest) => {
                debug!(
                    "{} has version {}, query asked for {}",
                    path.display(),
                    manifest.version,
                    query.version.as_deref().unwrap_or_default()
                );
                None
            }
            Err(e) => {
                warn!("Skipping unreadable manifest {}: {}", path.display(), e);
                None
            }
        }
    }

    fn list_buckets(&self) -> Result<BTreeSet<String>> {
        let mut buckets = BTreeSet::new();
        for entry in std::fs::read_dir(&self.buckets_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                buckets.insert(name.to_string());
            }
        }
        Ok(buckets)
    }
}

impl ManifestSource for BucketDirectory {
    fn lookup(&self, query: &str) -> ManifestInformation {
        let Ok(parsed) = AppQuery::parse(query) else {
            return ManifestInformation::missing(query);
        };

        let found = match parsed.bucket {
            Some(ref bucket) => self.load(bucket, &parsed).map(|m| (bucket.clone(), m)),
            None => {
                let buckets = self.local_buckets();
                search_order(&buckets)
                    .into_iter()
                    .find_map(|bucket| self.load(bucket, &parsed).map(|m| (bucket.to_string(), m)))
            }
        };

        match found {
            Some((bucket, manifest)) => {
                ManifestInformation::found(query, parsed.name, Some(bucket), manifest)
            }
            None => ManifestInformation::missing(query),
        }
    }

    fn local_buckets(&self) -> BTreeSet<String> {
        match self.list_buckets() {
            Ok(buckets) => buckets,
            Err(e) => {
                debug!("No buckets under {}: {}", self.buckets_dir.display(), e);
                BTreeSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn setup() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "buckets/main/bucket/git.json", r#"{"version": "2.43.0"}"#);
        write(root.path(), "buckets/extras/bucket/git.json", r#"{"version": "2.0.0"}"#);
        write(root.path(), "buckets/legacy/oldapp.json", r#"{"version": "0.1"}"#);
        write(root.path(), "buckets/main/bucket/broken.json", "{ not json");
        root
    }

    #[test]
    fn test_local_buckets() {
        let root = setup();
        let source = BucketDirectory::new(root.path());
        let buckets: Vec<String> = source.local_buckets().into_iter().collect();
        assert_eq!(buckets, vec!["extras", "legacy", "main"]);
    }

    #[test]
    fn test_local_buckets_without_directory() {
        let root = tempfile::tempdir().unwrap();
        let source = BucketDirectory::new(root.path());
        assert!(source.local_buckets().is_empty());
    }

    #[test]
    fn test_lookup_prefers_main_bucket() {
        let root = setup();
        let source = BucketDirectory::new(root.path());
        let info = source.lookup("git");
        assert_eq!(info.bucket.as_deref(), Some("main"));
        assert_eq!(info.version.as_deref(), Some("2.43.0"));

        let info = source.lookup("extras/git");
        assert_eq!(info.bucket.as_deref(), Some("extras"));
        assert_eq!(info.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_lookup_flat_bucket() {
        let root = setup();
        let source = BucketDirectory::new(root.path());
        assert!(source.lookup("oldapp").is_found());
        assert!(source.lookup("legacy/oldapp@0.1").is_found());
        assert!(!source.lookup("legacy/oldapp@0.2").is_found());
    }

    #[test]
    fn test_lookup_broken_manifest_is_missing() {
        let root = setup();
        let source = BucketDirectory::new(root.path());
        let info = source.lookup("broken");
        assert!(!info.is_found());
        assert_eq!(info.application_name, "broken");
    }

    #[test]
    fn test_lookup_does_not_leave_buckets_dir() {
        let root = setup();
        write(root.path(), "secret/bucket/app.json", r#"{"version": "1.0"}"#);
        let source = BucketDirectory::new(root.path());
        assert!(!source.lookup("../secret/app").is_found());
        assert!(!source.lookup("main/../../secret/bucket/app").is_found());
    }

    #[test]
    fn test_lookup_unknown_bucket() {
        let root = setup();
        let source = BucketDirectory::new(root.path());
        let info = source.lookup("games/git");
        assert!(!info.is_found());
        assert_eq!(info.bucket.as_deref(), Some("games"));
    }
}
