//! Resource registry.
//!
//! # Responsibilities
//! - Map resource names to their definitions
//! - Replace definitions atomically on re-registration or reload
//!
//! # Design Decisions
//! - Readers load a snapshot through `ArcSwap`; writers copy-on-write
//! - No I/O; definitions are validated before they get here

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{ResolveError, ResolveResult};
use crate::registry::defaults::default_resources;
use crate::registry::resource::CdnResource;

type ResourceMap = HashMap<String, Arc<CdnResource>>;

/// In-memory mapping from resource name to definition.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: ArcSwap<ResourceMap>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in resources.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for resource in default_resources() {
            registry.register(resource);
        }
        registry
    }

    /// Register a resource, replacing any prior definition with the same name.
    pub fn register(&self, resource: CdnResource) {
        let resource = Arc::new(resource);
        let replaced = self.resources.rcu(|current| {
            let mut next = ResourceMap::clone(current);
            next.insert(resource.name().to_string(), resource.clone());
            next
        });

        tracing::debug!(
            resource = %resource.name(),
            candidates = resource.candidates().len(),
            replaced = replaced.contains_key(resource.name()),
            "Resource registered"
        );
    }

    /// Swap the whole registry contents in one step.
    pub fn replace_all(&self, resources: Vec<CdnResource>) {
        let next: ResourceMap = resources
            .into_iter()
            .map(|r| (r.name().to_string(), Arc::new(r)))
            .collect();
        tracing::info!(resources = next.len(), "Resource registry replaced");
        self.resources.store(Arc::new(next));
    }

    /// Look up a resource definition.
    pub fn get(&self, name: &str) -> ResolveResult<Arc<CdnResource>> {
        self.resources
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownResource(name.to_string()))
    }

    /// Registered resource names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered resources, sorted by name.
    pub fn all(&self) -> Vec<Arc<CdnResource>> {
        let mut all: Vec<Arc<CdnResource>> = self.resources.load().values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn len(&self) -> usize {
        self.resources.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
