//! Huber penalty on the residual `x - x0`.
//!
//! Quadratic for residuals within `tau` of zero and linear beyond, scaled so
//! the two regions meet with equal value and slope at `|y| = tau`:
//!
//! ```text
//! h(y) = 0.5 * y² / tau     if |y| <= tau
//!        |y| - tau / 2      otherwise
//! ```
//!
//! The gradient `y / max(|y|, tau)` is bounded by 1 in magnitude, which makes
//! the penalty far less sensitive to outliers than [`SmoothQuad`](crate::SmoothQuad).

use sf_types::{EvalMode, Evaluation, EvaluationError, SfResult};
use sf_vector::DistVector;
use tracing::debug;

use crate::function::SmoothFunction;

#[derive(Debug, Clone)]
pub struct SmoothHuber {
    x0: DistVector,
    tau: f64,
}

impl SmoothHuber {
    /// Wrap the target `x0` with threshold `tau`, which must be finite and
    /// strictly positive.
    pub fn new(x0: DistVector, tau: f64) -> SfResult<Self> {
        if !(tau.is_finite() && tau > 0.0) {
            return Err(EvaluationError::InvalidThreshold { tau }.into());
        }
        x0.pin();
        Ok(Self { x0, tau })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn reference(&self) -> &DistVector {
        &self.x0
    }
}

fn quadratic_region(y: f64, tau: f64) -> f64 {
    0.5 * y * y / tau
}

fn linear_region(y: f64, tau: f64) -> f64 {
    y.abs() - 0.5 * tau
}

fn penalty(y: f64, tau: f64) -> f64 {
    if y.abs() <= tau {
        quadratic_region(y, tau)
    } else {
        linear_region(y, tau)
    }
}

fn slope(y: f64, tau: f64) -> f64 {
    y / y.abs().max(tau)
}

impl SmoothFunction for SmoothHuber {
    fn evaluate(&self, x: &DistVector, mode: EvalMode) -> SfResult<Evaluation<DistVector>> {
        if mode.is_empty() {
            return Ok(Evaluation::empty());
        }
        debug!(function = self.name(), %mode, tau = self.tau, "evaluating");

        let diff = x.sub(&self.x0)?;
        if mode.is_both() {
            diff.pin();
        }

        let tau = self.tau;
        let value = mode
            .value
            .then(|| diff.aggregate(0.0, move |acc, y| acc + penalty(y, tau), |a, b| a + b));
        let gradient = mode.gradient.then(|| diff.map(move |y| slope(y, tau)));

        Ok(Evaluation::new(value, gradient))
    }

    fn name(&self) -> &'static str {
        "huber"
    }
}
