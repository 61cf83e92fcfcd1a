//! Partitioning configuration.

use serde::{Deserialize, Serialize};
use sf_types::{validation_error, SfResult};

/// Upper bound on the partition count of a single vector.
pub const MAX_PARTITIONS: usize = 1 << 16;

/// How vectors are split and how reductions fan in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Number of partitions a dense vector is sliced into (1..=[`MAX_PARTITIONS`]).
    pub num_partitions: usize,

    /// Depth of the combine tree used by tree aggregation (>= 1).
    pub tree_depth: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            num_partitions: 4,
            tree_depth: 2,
        }
    }
}

impl PartitionConfig {
    pub fn with_partitions(mut self, n: usize) -> Self {
        self.num_partitions = n;
        self
    }

    pub fn with_tree_depth(mut self, depth: usize) -> Self {
        self.tree_depth = depth;
        self
    }

    pub fn validate(&self) -> SfResult<()> {
        if self.num_partitions == 0 {
            return Err(validation_error!("num_partitions must be at least 1"));
        }
        if self.num_partitions > MAX_PARTITIONS {
            return Err(validation_error!(
                "num_partitions must be at most {}, got {}",
                MAX_PARTITIONS,
                self.num_partitions
            ));
        }
        if self.tree_depth == 0 {
            return Err(validation_error!("tree_depth must be at least 1"));
        }
        Ok(())
    }
}
