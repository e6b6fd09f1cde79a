//! Dominance tree cache for one invocation
//!
//! Trees are keyed by the graph's content fingerprint and the root, so two
//! classpath views with identical content share one tree. A published tree
//! is never mutated; callers hold an `Arc` to it.

use crate::graph::{DependencyGraph, DominanceTree, GraphError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    root: String,
}

#[derive(Debug, Default)]
pub struct DominanceCache {
    trees: DashMap<CacheKey, Arc<DominanceTree>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl DominanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dominance tree of `graph` rooted at `root`, computed at most once
    /// per distinct graph content
    pub fn get_or_compute(
        &self,
        graph: &DependencyGraph,
        root: &str,
    ) -> Result<Arc<DominanceTree>, GraphError> {
        let key = CacheKey {
            fingerprint: graph.fingerprint(),
            root: root.to_string(),
        };

        if let Some(tree) = self.trees.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(tree.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Computing dominance tree for {} ({} nodes)", root, graph.node_count());
        let tree = Arc::new(DominanceTree::new(graph, root)?);

        // A concurrent caller may have published first; keep theirs
        let published = self.trees.entry(key).or_insert(tree);
        Ok(Arc::clone(published.value()))
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.trees.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} dominance trees cached ({} hits, {} misses)",
            self.entries, self.hits, self.misses
        )
    }
}
