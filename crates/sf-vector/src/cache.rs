use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

/// In-memory store for the materialized partitions of a pinned vector
#[derive(Debug, Default)]
pub(crate) struct PartitionCache {
    entries: DashMap<usize, Arc<[f64]>>,
    stats: RwLock<PartitionStats>,
}

impl PartitionCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Look up a cached partition, counting the hit or miss.
    pub(crate) fn get(&self, index: usize) -> Option<Arc<[f64]>> {
        let part = self.entries.get(&index).map(|entry| Arc::clone(entry.value()));
        let mut stats = self.stats.write();
        match part {
            Some(_) => stats.cache_hits += 1,
            None => stats.cache_misses += 1,
        }
        part
    }

    /// Store a freshly computed partition. If another worker stored the same
    /// partition first, its copy wins and is returned.
    pub(crate) fn insert(&self, index: usize, part: Arc<[f64]>) -> Arc<[f64]> {
        let entry = self.entries.entry(index).or_insert(part);
        Arc::clone(entry.value())
    }

    pub(crate) fn record_computed(&self) {
        self.stats.write().computed += 1;
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn stats(&self) -> PartitionStats {
        let mut stats = self.stats.read().clone();
        stats.cached_partitions = self.entries.len();
        stats.cached_elements = self.entries.iter().map(|e| e.value().len()).sum();
        stats
    }
}

/// Materialization counters for one vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Times a partition was computed from its lineage.
    pub computed: u64,
    /// Times a partition was served from the pin cache.
    pub cache_hits: u64,
    /// Lookups on a pinned vector that found nothing cached yet.
    pub cache_misses: u64,
    pub cached_partitions: usize,
    pub cached_elements: usize,
}

impl PartitionStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
