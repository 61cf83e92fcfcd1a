//! Lazily computed, partitioned vectors.
//!
//! A [`DistVector`] never stores derived data eagerly. Each vector knows its
//! partition layout and a lineage closure that recomputes any partition from
//! its parents. Pinning a vector keeps partitions in memory the first time
//! they are computed, so later reductions reuse them instead of replaying the
//! lineage.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use sf_types::{validation_error, SfResult, VectorError};
use tracing::{debug, trace};

use crate::cache::{PartitionCache, PartitionStats};
use crate::config::{PartitionConfig, MAX_PARTITIONS};

type Lineage = Arc<dyn Fn(usize) -> Arc<[f64]> + Send + Sync>;

/// A vector of reals split into partitions processed in parallel.
///
/// Cloning is cheap and shares the lineage and the pin cache.
#[derive(Clone)]
pub struct DistVector {
    inner: Arc<Inner>,
}

struct Inner {
    layout: Arc<[usize]>,
    lineage: Lineage,
    pinned: AtomicBool,
    cache: PartitionCache,
}

impl Inner {
    fn compute(&self, index: usize) -> Arc<[f64]> {
        self.cache.record_computed();
        trace!(partition = index, "computing partition from lineage");
        (self.lineage)(index)
    }
}

impl DistVector {
    fn from_lineage(layout: Arc<[usize]>, lineage: Lineage) -> Self {
        Self {
            inner: Arc::new(Inner {
                layout,
                lineage,
                pinned: AtomicBool::new(false),
                cache: PartitionCache::new(),
            }),
        }
    }

    /// Build a vector from explicit partitions.
    pub fn from_partitions(parts: Vec<Vec<f64>>) -> SfResult<Self> {
        if parts.is_empty() {
            return Err(VectorError::InvalidPartitionCount { count: 0 }.into());
        }

        let layout: Arc<[usize]> = parts.iter().map(Vec::len).collect();
        let data: Arc<[Arc<[f64]>]> = parts.into_iter().map(Arc::<[f64]>::from).collect();
        let lineage: Lineage = Arc::new(move |i: usize| -> Arc<[f64]> { Arc::clone(&data[i]) });

        Ok(Self::from_lineage(layout, lineage))
    }

    /// Slice a dense vector into `num_partitions` contiguous partitions.
    ///
    /// Partition `i` holds elements `[i*len/n, (i+1)*len/n)`, so sizes differ
    /// by at most one and trailing partitions may be empty for short inputs.
    /// `num_partitions` must lie in `1..=MAX_PARTITIONS`.
    pub fn from_vec(values: Vec<f64>, num_partitions: usize) -> SfResult<Self> {
        if num_partitions == 0 || num_partitions > MAX_PARTITIONS {
            return Err(VectorError::InvalidPartitionCount {
                count: num_partitions,
            }
            .into());
        }

        let len = values.len();
        let parts = (0..num_partitions)
            .map(|i| {
                let start = slice_bound(i, len, num_partitions);
                let end = slice_bound(i + 1, len, num_partitions);
                values[start..end].to_vec()
            })
            .collect();

        Self::from_partitions(parts)
    }

    pub fn from_vec_with(values: Vec<f64>, config: &PartitionConfig) -> SfResult<Self> {
        config.validate()?;
        Self::from_vec(values, config.num_partitions)
    }

    /// A vector with the same layout as `other`, every element set to `value`.
    pub fn filled_like(other: &DistVector, value: f64) -> Self {
        let layout = Arc::clone(&other.inner.layout);
        let lens = Arc::clone(&layout);
        let lineage: Lineage =
            Arc::new(move |i: usize| -> Arc<[f64]> { vec![value; lens[i]].into() });
        Self::from_lineage(layout, lineage)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.layout.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_partitions(&self) -> usize {
        self.inner.layout.len()
    }

    /// Element count of each partition.
    pub fn layout(&self) -> &[usize] {
        &self.inner.layout
    }

    pub fn same_shape(&self, other: &DistVector) -> bool {
        self.check_shape(other).is_ok()
    }

    fn check_shape(&self, other: &DistVector) -> SfResult<()> {
        let (left, right) = (self.layout(), other.layout());
        if left.len() != right.len() {
            return Err(VectorError::PartitionCountMismatch {
                left: left.len(),
                right: right.len(),
            }
            .into());
        }

        if let Some((partition, (l, r))) = left
            .iter()
            .zip(right.iter())
            .enumerate()
            .find(|(_, (l, r))| l != r)
        {
            return Err(VectorError::ShapeMismatch {
                partition,
                left: *l,
                right: *r,
            }
            .into());
        }

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Pinning
    // ---------------------------------------------------------------------

    /// Keep partitions in memory once computed. Idempotent.
    pub fn pin(&self) -> &Self {
        if !self.inner.pinned.swap(true, Ordering::AcqRel) {
            debug!(
                partitions = self.num_partitions(),
                elements = self.len(),
                "pinned vector"
            );
        }
        self
    }

    /// Drop cached partitions; later reads replay the lineage.
    pub fn unpin(&self) -> &Self {
        if self.inner.pinned.swap(false, Ordering::AcqRel) {
            self.inner.cache.clear();
            debug!(partitions = self.num_partitions(), "unpinned vector");
        }
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.inner.pinned.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> PartitionStats {
        self.inner.cache.stats()
    }

    fn materialize(&self, index: usize) -> Arc<[f64]> {
        let inner = &self.inner;
        if inner.pinned.load(Ordering::Acquire) {
            if let Some(part) = inner.cache.get(index) {
                return part;
            }
            let part = inner.compute(index);
            return inner.cache.insert(index, part);
        }
        inner.compute(index)
    }

    /// Read one partition.
    pub fn partition(&self, index: usize) -> SfResult<Arc<[f64]>> {
        let count = self.num_partitions();
        if index >= count {
            return Err(VectorError::PartitionOutOfRange { index, count }.into());
        }
        Ok(self.materialize(index))
    }

    /// Gather every element into a dense vector, in partition order.
    pub fn collect(&self) -> Vec<f64> {
        let parts: Vec<Arc<[f64]>> = (0..self.num_partitions())
            .into_par_iter()
            .map(|i| self.materialize(i))
            .collect();

        let mut values = Vec::with_capacity(self.len());
        for part in &parts {
            values.extend_from_slice(part);
        }
        values
    }

    // ---------------------------------------------------------------------
    // Transformations (lazy)
    // ---------------------------------------------------------------------

    /// Element-wise map.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let parent = self.clone();
        let lineage: Lineage = Arc::new(move |i: usize| -> Arc<[f64]> {
            parent.materialize(i).iter().map(|&v| f(v)).collect()
        });
        Self::from_lineage(Arc::clone(&self.inner.layout), lineage)
    }

    /// Element-wise combine with a same-shaped vector.
    ///
    /// The shape check runs immediately even though the combine itself is
    /// deferred until a partition is read.
    pub fn zip_with<F>(&self, other: &DistVector, f: F) -> SfResult<Self>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.check_shape(other)?;

        let left = self.clone();
        let right = other.clone();
        let lineage: Lineage = Arc::new(move |i: usize| -> Arc<[f64]> {
            let a = left.materialize(i);
            let b = right.materialize(i);
            a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()
        });

        Ok(Self::from_lineage(Arc::clone(&self.inner.layout), lineage))
    }

    /// Element-wise difference `self - other`.
    pub fn sub(&self, other: &DistVector) -> SfResult<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    // ---------------------------------------------------------------------
    // Reductions (eager)
    // ---------------------------------------------------------------------

    /// Fold every element with `seq` inside each partition, then merge the
    /// partition results with `comb` in partition order, so repeated calls
    /// give bit-identical results.
    pub fn aggregate<U, S, C>(&self, zero: U, seq: S, comb: C) -> U
    where
        U: Clone + Send + Sync,
        S: Fn(U, f64) -> U + Send + Sync,
        C: Fn(U, U) -> U + Send + Sync,
    {
        let partials: Vec<U> = (0..self.num_partitions())
            .into_par_iter()
            .map(|i| {
                self.materialize(i)
                    .iter()
                    .fold(zero.clone(), |acc, &v| seq(acc, v))
            })
            .collect();

        partials.into_iter().fold(zero, &comb)
    }

    /// Like [`aggregate`](Self::aggregate) over element pairs of two
    /// same-shaped vectors. Mismatched layouts are an error, never truncated.
    pub fn zip_aggregate<U, S, C>(&self, other: &DistVector, zero: U, seq: S, comb: C) -> SfResult<U>
    where
        U: Clone + Send + Sync,
        S: Fn(U, f64, f64) -> U + Send + Sync,
        C: Fn(U, U) -> U + Send + Sync,
    {
        self.check_shape(other)?;

        let partials: Vec<U> = (0..self.num_partitions())
            .into_par_iter()
            .map(|i| {
                let a = self.materialize(i);
                let b = other.materialize(i);
                a.iter()
                    .zip(b.iter())
                    .fold(zero.clone(), |acc, (&x, &y)| seq(acc, x, y))
            })
            .collect();

        Ok(partials.into_iter().fold(zero, &comb))
    }

    /// Reduce each partition slice with `seq`, then merge the partials level by
    /// level in groups of `max(ceil(n^(1/depth)), 2)`.
    pub fn tree_aggregate<U, S, C>(&self, zero: U, seq: S, comb: C, depth: usize) -> SfResult<U>
    where
        U: Clone + Send + Sync,
        S: Fn(U, &[f64]) -> U + Send + Sync,
        C: Fn(U, U) -> U + Send + Sync,
    {
        if depth == 0 {
            return Err(validation_error!("tree depth must be at least 1, got {}", depth));
        }

        let n = self.num_partitions();
        let mut partials: Vec<U> = (0..n)
            .into_par_iter()
            .map(|i| seq(zero.clone(), &self.materialize(i)[..]))
            .collect();

        let scale = ((n as f64).powf(1.0 / depth as f64).ceil() as usize).max(2);
        let mut level = 1;
        while level < depth && partials.len() > scale {
            partials = partials
                .into_par_iter()
                .chunks(scale)
                .map(|group| group.into_iter().fold(zero.clone(), &comb))
                .collect();
            level += 1;
        }

        trace!(partitions = n, levels = level, "tree aggregate merged");
        Ok(partials.into_iter().fold(zero, &comb))
    }

    pub fn sum(&self) -> f64 {
        self.aggregate(0.0, |acc, v| acc + v, |a, b| a + b)
    }
}

/// `i * len / n` without intermediate overflow. Never exceeds `len` for `i <= n`.
fn slice_bound(i: usize, len: usize, n: usize) -> usize {
    (i as u128 * len as u128 / n as u128) as usize
}

impl fmt::Debug for DistVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistVector")
            .field("len", &self.len())
            .field("partitions", &self.num_partitions())
            .field("pinned", &self.is_pinned())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_values(seed: u64, len: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random_range(-10.0..10.0)).collect()
    }

    #[test]
    fn from_vec_slices_contiguously() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let v = DistVector::from_vec(values.clone(), 3).unwrap();
        assert_eq!(v.layout(), &[3, 3, 4]);
        assert_eq!(v.len(), 10);
        assert_eq!(v.collect(), values);
    }

    #[test]
    fn short_input_leaves_empty_partitions() {
        let v = DistVector::from_vec(vec![1.0, 2.0], 5).unwrap();
        assert_eq!(v.num_partitions(), 5);
        assert_eq!(v.len(), 2);
        assert_eq!(v.sum(), 3.0);
    }

    #[test]
    fn zero_partitions_rejected() {
        assert!(DistVector::from_vec(vec![1.0], 0).is_err());
        assert!(DistVector::from_partitions(Vec::new()).is_err());
        let bad = PartitionConfig::default().with_partitions(0);
        assert!(DistVector::from_vec_with(vec![1.0], &bad).is_err());
    }

    #[test]
    fn oversized_partition_count_rejected() {
        for count in [MAX_PARTITIONS + 1, usize::MAX] {
            let err = DistVector::from_vec(vec![0.0], count).unwrap_err();
            assert!(matches!(
                err,
                sf_types::SfError::Vector(VectorError::InvalidPartitionCount { count: c }) if c == count
            ));
        }
        assert_eq!(DistVector::from_vec(vec![1.0; 3], MAX_PARTITIONS).unwrap().len(), 3);
    }

    #[test]
    fn slice_bounds_do_not_overflow() {
        let len = usize::MAX / 2;
        assert_eq!(slice_bound(0, len, 3), 0);
        assert_eq!(slice_bound(3, len, 3), len);
        assert_eq!(slice_bound(2, len, 4), len / 2);
    }

    #[test]
    fn sub_and_map_are_element_wise() {
        let a = DistVector::from_vec(vec![5.0, 7.0, 9.0], 2).unwrap();
        let b = DistVector::from_vec(vec![1.0, 2.0, 3.0], 2).unwrap();
        let d = a.sub(&b).unwrap().map(|v| v * 2.0);
        assert_eq!(d.collect(), vec![8.0, 10.0, 12.0]);
    }

    #[test]
    fn filled_like_copies_layout() {
        let a = DistVector::from_vec(vec![1.0; 7], 3).unwrap();
        let z = DistVector::filled_like(&a, 0.0);
        assert!(z.same_shape(&a));
        assert_eq!(z.collect(), vec![0.0; 7]);
    }

    #[test]
    fn element_count_mismatch_is_reported() {
        let a = DistVector::from_partitions(vec![vec![1.0, 2.0], vec![3.0]]).unwrap();
        let b = DistVector::from_partitions(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

        let err = a.sub(&b).unwrap_err();
        assert!(err.is_shape_mismatch());
        match err {
            sf_types::SfError::Vector(VectorError::ShapeMismatch { partition, left, right }) => {
                assert_eq!((partition, left, right), (1, 1, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(a
            .zip_aggregate(&b, 0.0, |acc, x, y| acc + x * y, |p, q| p + q)
            .unwrap_err()
            .is_shape_mismatch());
    }

    #[test]
    fn partition_count_mismatch_is_reported() {
        let a = DistVector::from_vec(vec![1.0; 4], 2).unwrap();
        let b = DistVector::from_vec(vec![1.0; 4], 4).unwrap();
        let err = a.zip_with(&b, |x, y| x + y).unwrap_err();
        assert!(matches!(
            err,
            sf_types::SfError::Vector(VectorError::PartitionCountMismatch { left: 2, right: 4 })
        ));
    }

    #[test]
    fn partition_out_of_range() {
        let a = DistVector::from_vec(vec![1.0; 4], 2).unwrap();
        assert_eq!(&*a.partition(1).unwrap(), &[1.0, 1.0]);
        assert!(a.partition(2).is_err());
    }

    #[test]
    fn transformations_are_lazy() {
        let a = DistVector::from_vec(vec![1.0; 8], 4).unwrap();
        let m = a.map(|v| v + 1.0);
        assert_eq!(m.stats().computed, 0);

        m.collect();
        assert_eq!(m.stats().computed, 4);
    }

    #[test]
    fn pinned_vector_computes_each_partition_once() {
        let a = DistVector::from_vec(random_values(1, 50), 5).unwrap();
        let b = DistVector::from_vec(random_values(2, 50), 5).unwrap();
        let d = a.sub(&b).unwrap();
        d.pin();
        d.pin();

        let total = d.sum();
        let dense = d.collect();
        assert!((total - dense.iter().sum::<f64>()).abs() < 1e-9);

        let stats = d.stats();
        assert_eq!(stats.computed, 5);
        assert_eq!(stats.cache_hits, 5);
        assert_eq!(stats.cache_misses, 5);
        assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
        assert_eq!(stats.cached_partitions, 5);
        assert_eq!(stats.cached_elements, 50);
    }

    #[test]
    fn unpinned_vector_replays_lineage() {
        let a = DistVector::from_vec(random_values(3, 20), 4).unwrap();
        let m = a.map(|v| v * v);
        m.sum();
        m.sum();
        assert_eq!(m.stats().computed, 8);
        assert_eq!(m.stats().cache_hits, 0);
        assert_eq!(m.stats().cache_misses, 0);
    }

    #[test]
    fn unpin_clears_cache() {
        let a = DistVector::from_vec(vec![2.0; 6], 3).unwrap();
        let m = a.map(|v| v / 2.0);
        m.pin();
        m.sum();
        assert_eq!(m.stats().cached_partitions, 3);

        m.unpin();
        assert!(!m.is_pinned());
        assert_eq!(m.stats().cached_partitions, 0);
    }

    #[test]
    fn tree_aggregate_matches_flat_sum() {
        let values = random_values(4, 1000);
        let expected: f64 = values.iter().sum();
        let v = DistVector::from_vec(values, 37).unwrap();

        for depth in 1..=4 {
            let total = v
                .tree_aggregate(0.0, |acc, part: &[f64]| acc + part.iter().sum::<f64>(), |a, b| a + b, depth)
                .unwrap();
            assert!((total - expected).abs() < 1e-8, "depth {depth}: {total} vs {expected}");
        }
    }

    #[test]
    fn tree_aggregate_rejects_zero_depth() {
        let v = DistVector::from_vec(vec![1.0; 4], 2).unwrap();
        let err = v
            .tree_aggregate(0.0, |acc, part: &[f64]| acc + part.len() as f64, |a, b| a + b, 0)
            .unwrap_err();
        assert!(matches!(err, sf_types::SfError::Validation(_)));
    }

    #[test]
    fn concurrent_pin_and_reduce_agree() {
        let a = DistVector::from_vec(random_values(5, 400), 8).unwrap();
        let m = a.map(|v| v.abs());
        let expected = m.collect().iter().sum::<f64>();

        let results: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..6)
                .map(|_| {
                    scope.spawn(|| {
                        m.pin();
                        m.sum()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for r in results {
            assert!((r - expected).abs() < 1e-9);
        }
        assert_eq!(m.stats().cached_partitions, 8);
    }
}
