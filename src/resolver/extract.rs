// src/resolver/extract.rs

//! Direct dependency extraction for a single manifest

use crate::config::HelperConfig;
use crate::helpers::{Helper, HelperDetector, HelperProbe};
use crate::manifest::{Architecture, Manifest};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Dependency Extractor
///
/// Produces the identifiers that must be installed before a manifest:
/// its declared `depends` plus the helpers its downloads and install
/// scripts need.
pub struct DependencyExtractor<'a> {
    detector: HelperDetector<'a>,
}

impl<'a> DependencyExtractor<'a> {
    pub fn new(config: &'a HelperConfig, probe: &'a dyn HelperProbe) -> Self {
        Self {
            detector: HelperDetector::new(config, probe),
        }
    }

    /// Helpers required by `manifest` on `arch` that are not yet installed
    pub fn helpers(&self, manifest: &Manifest, arch: Architecture) -> BTreeSet<Helper> {
        self.detector.for_manifest(
            &manifest.urls(arch),
            manifest.innosetup,
            &manifest.install_script(arch),
        )
    }

    /// All distinct dependency identifiers of `manifest` on `arch`
    ///
    /// Declared dependencies come first in manifest order, followed by
    /// helper identifiers.
    pub fn dependencies(&self, manifest: &Manifest, arch: Architecture) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut deps = Vec::new();

        let declared = manifest.depends().iter().map(|d| d.trim().to_string());
        let helpers = self
            .helpers(manifest, arch)
            .into_iter()
            .map(|h| h.app_name().to_string());

        for dep in declared.chain(helpers) {
            if !dep.is_empty() && seen.insert(dep.clone()) {
                deps.push(dep);
            }
        }

        debug!("Dependencies for {} ({}): {:?}", manifest.version, arch, deps);
        deps
    }
}
