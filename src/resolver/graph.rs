// src/resolver/graph.rs

//! Depth-first dependency walk with cycle detection
//!
//! The walk is iterative: every in-progress application owns one frame on
//! an explicit stack, so deep chains cost heap rather than call stack.
//! A name is either unvisited, on the stack (being expanded) or resolved.
//! Meeting a name that is on the stack is a cycle; meeting a resolved name
//! is a diamond and is skipped.

use super::extract::DependencyExtractor;
use crate::error::{Error, Result};
use crate::manifest::{AppQuery, Architecture, ManifestInformation};
use crate::repository::ManifestSource;
use std::collections::HashSet;
use tracing::debug;

/// Default limit on the length of a dependency chain
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// An application being expanded
struct Frame {
    info: ManifestInformation,
    pending: std::vec::IntoIter<String>,
}

/// Recursive Resolver
pub struct DependencyResolver<'a> {
    source: &'a dyn ManifestSource,
    extractor: DependencyExtractor<'a>,
    max_depth: usize,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(source: &'a dyn ManifestSource, extractor: DependencyExtractor<'a>) -> Self {
        Self {
            source,
            extractor,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum dependency chain length
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn source(&self) -> &dyn ManifestSource {
        self.source
    }

    /// Resolve `root` into install order, dependencies first and `root` last
    pub fn resolve(
        &self,
        root: &ManifestInformation,
        arch: Architecture,
    ) -> Result<Vec<ManifestInformation>> {
        let mut resolved: Vec<ManifestInformation> = Vec::new();
        let mut resolved_names: HashSet<String> = HashSet::new();
        let mut on_stack: HashSet<String> = HashSet::new();
        let mut stack: Vec<Frame> = Vec::new();

        on_stack.insert(root.application_name.clone());
        stack.push(self.expand(root.clone(), arch)?);

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            let Some(dep) = frame.pending.next() else {
                // All dependencies resolved, the application itself is next
                if let Some(done) = stack.pop() {
                    on_stack.remove(&done.info.application_name);
                    resolved_names.insert(done.info.application_name.clone());
                    resolved.push(done.info);
                }
                continue;
            };

            let name = AppQuery::app_name(&dep);
            if resolved_names.contains(&name) {
                continue;
            }

            if on_stack.contains(&name) {
                let parent = frame.info.application_name.clone();
                let mut cycle: Vec<String> = stack
                    .iter()
                    .map(|f| f.info.application_name.clone())
                    .skip_while(|n| *n != name)
                    .collect();
                cycle.push(name.clone());
                return Err(Error::CircularDependency {
                    application: parent,
                    dependency: dep,
                    cycle,
                });
            }

            if stack.len() >= self.max_depth {
                return Err(Error::DependencyTooDeep {
                    application: root.application_name.clone(),
                    limit: self.max_depth,
                });
            }

            let info = self.source.lookup(&dep);
            on_stack.insert(info.application_name.clone());
            stack.push(self.expand(info, arch)?);
        }

        Ok(resolved)
    }

    /// Dependencies of `root` in install order, without `root` itself
    ///
    /// An application without dependencies yields an empty vector.
    pub fn dependency_closure(
        &self,
        root: &ManifestInformation,
        arch: Architecture,
    ) -> Result<Vec<ManifestInformation>> {
        let mut resolved = self.resolve(root, arch)?;
        resolved.pop();
        Ok(resolved)
    }

    /// Open a frame for `info`, failing if it has no manifest
    fn expand(&self, info: ManifestInformation, arch: Architecture) -> Result<Frame> {
        let Some(ref manifest) = info.manifest else {
            return Err(self.source.not_found_error(&info));
        };

        let deps = self.extractor.dependencies(manifest, arch);
        debug!(
            "Expanding {} with {} direct dependencies",
            info.qualified_name(),
            deps.len()
        );

        Ok(Frame {
            info,
            pending: deps.into_iter(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HelperConfig;
    use crate::helpers::InstalledSet;
    use crate::manifest::{Manifest, OneOrMany};
    use crate::repository::MemorySource;

    fn manifest(depends: &[&str]) -> Manifest {
        Manifest {
            version: "1.0".to_string(),
            depends: OneOrMany::Many(depends.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    fn names(list: &[ManifestInformation]) -> Vec<&str> {
        list.iter().map(|i| i.application_name.as_str()).collect()
    }

    fn closure(source: &MemorySource, app: &str) -> Result<Vec<ManifestInformation>> {
        let config = HelperConfig::default();
        let probe = InstalledSet::none();
        let resolver = DependencyResolver::new(source, DependencyExtractor::new(&config, &probe));
        resolver.dependency_closure(&source.lookup(app), Architecture::X64)
    }

    #[test]
    fn test_no_dependencies_is_empty() {
        let source = MemorySource::new().with("main", "a", manifest(&[]));
        assert!(closure(&source, "a").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_includes_root_last() {
        let source = MemorySource::new()
            .with("main", "a", manifest(&["b"]))
            .with("main", "b", manifest(&[]));
        let config = HelperConfig::default();
        let probe = InstalledSet::none();
        let resolver = DependencyResolver::new(&source, DependencyExtractor::new(&config, &probe));
        let order = resolver.resolve(&source.lookup("a"), Architecture::X64).unwrap();
        assert_eq!(names(&order), vec!["b", "a"]);
    }

    #[test]
    fn test_chain_is_topological() {
        let source = MemorySource::new()
            .with("main", "a", manifest(&["b"]))
            .with("main", "b", manifest(&["c"]))
            .with("main", "c", manifest(&[]));
        assert_eq!(names(&closure(&source, "a").unwrap()), vec!["c", "b"]);
    }

    #[test]
    fn test_diamond_resolves_shared_dependency_once() {
        let source = MemorySource::new()
            .with("main", "a", manifest(&["b", "c"]))
            .with("main", "b", manifest(&["d"]))
            .with("main", "c", manifest(&["d"]))
            .with("main", "d", manifest(&[]));
        assert_eq!(names(&closure(&source, "a").unwrap()), vec!["d", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_detected() {
        let source = MemorySource::new()
            .with("main", "a", manifest(&["b"]))
            .with("main", "b", manifest(&["a"]));
        match closure(&source, "a") {
            Err(Error::CircularDependency {
                application,
                dependency,
                cycle,
            }) => {
                assert_eq!(application, "b");
                assert_eq!(dependency, "a");
                assert_eq!(cycle, vec!["a", "b", "a"]);
            }
            other => panic!("expected circular dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_indirect_cycle_path_starts_at_revisited_node() {
        let source = MemorySource::new()
            .with("main", "root", manifest(&["a"]))
            .with("main", "a", manifest(&["b"]))
            .with("main", "b", manifest(&["c"]))
            .with("main", "c", manifest(&["main/a"]));
        match closure(&source, "root") {
            Err(Error::CircularDependency { cycle, .. }) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected circular dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let source = MemorySource::new().with("main", "a", manifest(&["a"]));
        assert!(matches!(
            closure(&source, "a"),
            Err(Error::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_missing_dependency() {
        let source = MemorySource::new().with("main", "a", manifest(&["ghost"]));
        match closure(&source, "a") {
            Err(Error::ManifestNotFound {
                query,
                bucket,
                missing_bucket,
            }) => {
                assert_eq!(query, "ghost");
                assert_eq!(bucket, None);
                assert_eq!(missing_bucket, None);
            }
            other => panic!("expected missing manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_bucket_hint() {
        let source = MemorySource::new()
            .with("main", "a", manifest(&["extras/b"]))
            .with("versions", "c", manifest(&["versions/ghost"]));

        match closure(&source, "a") {
            Err(Error::ManifestNotFound { missing_bucket, .. }) => {
                assert_eq!(missing_bucket.as_deref(), Some("extras"));
            }
            other => panic!("expected missing manifest, got {:?}", other),
        }

        // Registered bucket, the app is just not in it
        match closure(&source, "c") {
            Err(Error::ManifestNotFound {
                bucket,
                missing_bucket,
                ..
            }) => {
                assert_eq!(bucket.as_deref(), Some("versions"));
                assert_eq!(missing_bucket, None);
            }
            other => panic!("expected missing manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_root() {
        let source = MemorySource::new();
        assert!(matches!(
            closure(&source, "nothing"),
            Err(Error::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut source = MemorySource::new();
        for i in 0..10 {
            source.insert("main", format!("app{}", i), manifest(&[&format!("app{}", i + 1)]));
        }
        source.insert("main", "app10", manifest(&[]));

        let config = HelperConfig::default();
        let probe = InstalledSet::none();
        let root = source.lookup("app0");

        let shallow = DependencyResolver::new(&source, DependencyExtractor::new(&config, &probe))
            .with_max_depth(5);
        assert!(matches!(
            shallow.dependency_closure(&root, Architecture::X64),
            Err(Error::DependencyTooDeep { limit: 5, .. })
        ));

        let deep = DependencyResolver::new(&source, DependencyExtractor::new(&config, &probe));
        assert_eq!(deep.dependency_closure(&root, Architecture::X64).unwrap().len(), 10);
    }

    #[test]
    fn test_very_long_chain_does_not_overflow() {
        let mut source = MemorySource::new();
        let length = 5_000;
        for i in 0..length {
            source.insert("main", format!("n{}", i), manifest(&[&format!("n{}", i + 1)]));
        }
        source.insert("main", format!("n{}", length), manifest(&[]));

        let config = HelperConfig::default();
        let probe = InstalledSet::none();
        let resolver = DependencyResolver::new(&source, DependencyExtractor::new(&config, &probe))
            .with_max_depth(length + 10);
        let order = resolver
            .dependency_closure(&source.lookup("n0"), Architecture::X64)
            .unwrap();
        assert_eq!(order.len(), length);
        assert_eq!(order[0].application_name, format!("n{}", length));
    }

    #[test]
    fn test_helper_dependencies_are_resolved() {
        let mut app = manifest(&[]);
        app.url = Some(OneOrMany::One("https://example.com/app.7z".to_string()));
        let source = MemorySource::new()
            .with("main", "app", app)
            .with("main", "7zip", manifest(&[]));
        assert_eq!(names(&closure(&source, "app").unwrap()), vec!["7zip"]);
    }
}
