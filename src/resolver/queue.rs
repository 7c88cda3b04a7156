// src/resolver/queue.rs

//! Installation Queue Builder
//!
//! Resolves every requested application and merges the individual
//! dependency closures into one queue. Each request contributes its local
//! install order; entries already queued by an earlier request are kept
//! where they first appeared.
//!
//! A request that cannot be resolved is recorded in
//! [`InstallQueue::failures`] and the remaining requests are still
//! processed.

use super::graph::DependencyResolver;
use super::plan::{InstallQueue, QueueFailure, VersionNote};
use crate::error::Error;
use crate::manifest::{Architecture, ManifestInformation};
use crate::version::compare_versions;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct InstallQueueBuilder<'a> {
    resolver: &'a DependencyResolver<'a>,
}

impl<'a> InstallQueueBuilder<'a> {
    pub fn new(resolver: &'a DependencyResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Build one queue for `requested`, in request order
    pub fn build(&self, requested: &[ManifestInformation], arch: Architecture) -> InstallQueue {
        let mut queue = InstallQueue::default();
        let mut seen_requests: HashSet<&str> = HashSet::new();

        for request in requested {
            if !seen_requests.insert(request.application_name.as_str()) {
                warn!(
                    "Ignoring duplicate request for {} ({})",
                    request.application_name, request.original_query
                );
                continue;
            }

            let closure = match self.resolver.dependency_closure(request, arch) {
                Ok(closure) => closure,
                Err(e) => {
                    warn!("Could not resolve {}: {}", request.original_query, e);
                    queue.failures.push(QueueFailure {
                        query: request.original_query.clone(),
                        error: e,
                    });
                    continue;
                }
            };

            debug!(
                "{} needs {} dependencies",
                request.application_name,
                closure.len()
            );
            for dependency in closure {
                merge_dependency(&mut queue, dependency);
            }

            if queue.contains(&request.application_name) {
                warn!(
                    "{} was already queued as a dependency of another request",
                    request.application_name
                );
                queue.failures.push(QueueFailure {
                    query: request.original_query.clone(),
                    error: Error::DependencyResolvesToSelf {
                        application: request.application_name.clone(),
                    },
                });
                continue;
            }

            let mut entry = request.clone();
            entry.is_dependency = false;
            queue.entries.push(entry);
        }

        queue
    }
}

/// Append `dependency` unless it is queued already
///
/// The first queued entry always wins. A strictly newer candidate only
/// produces a [`VersionNote`].
fn merge_dependency(queue: &mut InstallQueue, mut dependency: ManifestInformation) {
    if !queue.contains(&dependency.application_name) {
        dependency.is_dependency = true;
        queue.entries.push(dependency);
        return;
    }

    let note = queue
        .get(&dependency.application_name)
        .and_then(|existing| newer_candidate(existing, &dependency));
    if let Some(note) = note {
        info!(
            "Keeping {} {} although {} is newer",
            note.application, note.queued, note.candidate
        );
        queue.notes.push(note);
    }
}

fn newer_candidate(
    existing: &ManifestInformation,
    candidate: &ManifestInformation,
) -> Option<VersionNote> {
    let queued = existing.version.as_deref()?;
    let wanted = candidate.version.as_deref()?;
    match compare_versions(queued, wanted) {
        Some(Ordering::Less) => Some(VersionNote {
            application: existing.application_name.clone(),
            queued: queued.to_string(),
            candidate: wanted.to_string(),
        }),
        _ => None,
    }
}
