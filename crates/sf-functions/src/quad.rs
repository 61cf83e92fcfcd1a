//! Quadratic objective `f(x) = 0.5 * ||x - x0||²`.

use sf_types::{EvalMode, Evaluation, SfResult};
use sf_vector::{linalg, DistVector, PartitionConfig};
use tracing::debug;

use crate::function::SmoothFunction;

#[derive(Debug, Clone)]
pub struct SmoothQuad {
    x0: DistVector,
    tree_depth: usize,
}

impl SmoothQuad {
    /// Wrap the target `x0`, pinning it for reuse across evaluations.
    pub fn new(x0: DistVector) -> Self {
        Self::with_tree_depth(x0, PartitionConfig::default().tree_depth)
    }

    pub fn with_config(x0: DistVector, config: &PartitionConfig) -> SfResult<Self> {
        config.validate()?;
        Ok(Self::with_tree_depth(x0, config.tree_depth))
    }

    fn with_tree_depth(x0: DistVector, tree_depth: usize) -> Self {
        x0.pin();
        Self { x0, tree_depth }
    }

    pub fn reference(&self) -> &DistVector {
        &self.x0
    }
}

impl SmoothFunction for SmoothQuad {
    fn evaluate(&self, x: &DistVector, mode: EvalMode) -> SfResult<Evaluation<DistVector>> {
        if mode.is_empty() {
            return Ok(Evaluation::empty());
        }
        debug!(function = self.name(), %mode, elements = x.len(), "evaluating");

        let residual = x.sub(&self.x0)?;
        if mode.is_both() {
            residual.pin();
        }

        let value = if mode.value {
            let sum_sq = residual.tree_aggregate(
                0.0,
                |acc, part: &[f64]| acc + linalg::squared_norm(part),
                |a, b| a + b,
                self.tree_depth,
            )?;
            Some(0.5 * sum_sq)
        } else {
            None
        };

        let gradient = mode.gradient.then_some(residual);
        Ok(Evaluation::new(value, gradient))
    }

    fn name(&self) -> &'static str {
        "quadratic"
    }
}
