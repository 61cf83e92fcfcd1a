//! The result of evaluating a smooth function under an [`EvalMode`].

use crate::errors::{EvaluationError, SfResult};
use crate::mode::EvalMode;

/// Value and/or gradient produced by one evaluation.
///
/// `value` is present iff the mode requested a value and `gradient` is present
/// iff the mode requested a gradient. Reading an absent field through
/// [`Evaluation::value`] or [`Evaluation::into_gradient`] is a contract
/// violation and is reported as an error rather than defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<G> {
    pub value: Option<f64>,
    pub gradient: Option<G>,
}

impl<G> Evaluation<G> {
    pub fn new(value: Option<f64>, gradient: Option<G>) -> Self {
        Self { value, gradient }
    }

    /// Result of a call that requested nothing.
    pub fn empty() -> Self {
        Self {
            value: None,
            gradient: None,
        }
    }

    /// The mode this result satisfies.
    pub fn mode(&self) -> EvalMode {
        EvalMode::new(self.value.is_some(), self.gradient.is_some())
    }

    pub fn value(&self) -> SfResult<f64> {
        self.value
            .ok_or_else(|| EvaluationError::ValueNotComputed.into())
    }

    pub fn gradient(&self) -> SfResult<&G> {
        self.gradient
            .as_ref()
            .ok_or_else(|| EvaluationError::GradientNotComputed.into())
    }

    pub fn into_gradient(self) -> SfResult<G> {
        self.gradient
            .ok_or_else(|| EvaluationError::GradientNotComputed.into())
    }

    /// Transform the gradient, e.g. to collect it into a dense vector.
    pub fn map_gradient<H, F>(self, f: F) -> SfResult<Evaluation<H>>
    where
        F: FnOnce(G) -> SfResult<H>,
    {
        let gradient = self.gradient.map(f).transpose()?;
        Ok(Evaluation {
            value: self.value,
            gradient,
        })
    }
}
