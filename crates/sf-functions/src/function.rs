//! The contract shared by every smooth objective.

use sf_types::{EvalMode, Evaluation, SfResult};
use sf_vector::DistVector;

/// A smooth objective evaluated over partitioned vectors.
///
/// Implementations hold their reference data fixed for the lifetime of the
/// instance and never mutate either it or the candidate vector. Work done by
/// [`evaluate`](Self::evaluate) scales with the outputs `mode` requests: a
/// value-only call runs no gradient work and vice versa.
pub trait SmoothFunction: Send + Sync {
    /// Evaluate at `x`, producing exactly the outputs selected by `mode`.
    ///
    /// `x` must have the same partition layout as the reference data; a
    /// mismatch fails with a shape error. A mode requesting nothing returns an
    /// empty [`Evaluation`] without touching the data.
    fn evaluate(&self, x: &DistVector, mode: EvalMode) -> SfResult<Evaluation<DistVector>>;

    /// Value-only shorthand for [`evaluate`](Self::evaluate).
    fn evaluate_value(&self, x: &DistVector) -> SfResult<f64> {
        self.evaluate(x, EvalMode::VALUE)?.value()
    }

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;
}
