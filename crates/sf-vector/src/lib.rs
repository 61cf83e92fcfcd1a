//! # sf-vector
//!
//! Partitioned vectors for smoothfn.
//!
//! Provides [`DistVector`], a lazily evaluated vector split into partitions
//! that are processed on the rayon pool, with lineage-based recomputation,
//! idempotent pinning, and flat or tree-structured reductions.

mod cache;
mod config;
pub mod linalg;
mod vector;

pub use cache::PartitionStats;
pub use config::{PartitionConfig, MAX_PARTITIONS};
pub use vector::DistVector;
