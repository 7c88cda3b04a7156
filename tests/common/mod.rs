// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use scoop_deps::helpers::AppsDirProbe;
use scoop_deps::{
    Architecture, BucketDirectory, DependencyExtractor, DependencyResolver, HelperConfig,
    InstallQueue, InstallQueueBuilder, ManifestInformation, ManifestSource,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A root directory with `buckets/` and `apps/`.
///
/// Keep the value alive to prevent cleanup.
pub struct TestRoot {
    pub dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("buckets").join("main").join("bucket")).unwrap();
        fs::create_dir_all(dir.path().join("apps")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `buckets/<bucket>/bucket/<name>.json`
    pub fn manifest(&self, bucket: &str, name: &str, json: &str) -> &Self {
        let dir = self.path().join("buckets").join(bucket).join("bucket");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.json", name)), json).unwrap();
        self
    }

    /// Write a manifest with a version and declared dependencies only
    pub fn simple(&self, bucket: &str, name: &str, version: &str, depends: &[&str]) -> &Self {
        let depends: Vec<String> = depends.iter().map(|d| format!("\"{}\"", d)).collect();
        self.manifest(
            bucket,
            name,
            &format!(
                r#"{{"version": "{}", "depends": [{}]}}"#,
                version,
                depends.join(", ")
            ),
        )
    }

    /// Mark an application as installed (`apps/<name>/current`)
    pub fn install(&self, name: &str) -> &Self {
        fs::create_dir_all(self.path().join("apps").join(name).join("current")).unwrap();
        self
    }

    /// Register every helper as an app manifest in `main`
    pub fn helper_manifests(&self) -> &Self {
        for helper in ["7zip", "lessmsi", "innounp", "innoextract", "zstd"] {
            self.simple("main", helper, "1.0", &[]);
        }
        self
    }

    pub fn source(&self) -> BucketDirectory {
        BucketDirectory::new(self.path())
    }

    /// Probe that only looks at this root's `apps/` directory, never `PATH`
    pub fn probe(&self) -> AppsDirProbe {
        AppsDirProbe::new(self.path())
    }

    /// Look up `queries` and build a queue with `config`
    pub fn queue_with(&self, queries: &[&str], config: &HelperConfig) -> InstallQueue {
        let source = self.source();
        let probe = self.probe();
        let resolver = DependencyResolver::new(&source, DependencyExtractor::new(config, &probe));
        let requested: Vec<ManifestInformation> = queries.iter().map(|q| source.lookup(q)).collect();
        InstallQueueBuilder::new(&resolver).build(&requested, Architecture::X64)
    }

    pub fn queue(&self, queries: &[&str]) -> InstallQueue {
        self.queue_with(queries, &HelperConfig::default())
    }

    /// Direct dependencies of one manifest
    pub fn depends_with(&self, query: &str, config: &HelperConfig) -> Vec<String> {
        let source = self.source();
        let probe = self.probe();
        let info = source.lookup(query);
        let manifest = info.manifest.expect("manifest should exist");
        DependencyExtractor::new(config, &probe).dependencies(&manifest, Architecture::X64)
    }
}
