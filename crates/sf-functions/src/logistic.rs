//! Logistic log-likelihood of observed labels `y` given linear predictors `mu`.
//!
//! Per element the log-likelihood is `y·mu − log(1 + e^mu)`. Both the value and
//! the gradient are rearranged so every exponential is taken of `−|mu|`, which
//! keeps them finite for predictors of any magnitude:
//!
//! ```text
//! value_i    = yf·mu − log(1 + e^(−|mu|))      yf = y − 1 (mu > 0), y (mu < 0), 0 (mu = 0)
//! gradient_i = y − mf / (1 + e^(−|mu|))        mf = 1 (mu > 0), e^mu otherwise
//! ```

use sf_types::{EvalMode, Evaluation, SfResult};
use sf_vector::DistVector;
use tracing::debug;

use crate::function::SmoothFunction;

#[derive(Debug, Clone)]
pub struct SmoothLogLLogistic {
    y: DistVector,
}

impl SmoothLogLLogistic {
    /// Wrap the observed labels, pinning them for reuse across evaluations.
    pub fn new(y: DistVector) -> Self {
        y.pin();
        Self { y }
    }

    pub fn observed(&self) -> &DistVector {
        &self.y
    }
}

fn log_likelihood(y: f64, mu: f64) -> f64 {
    let y_factor = if mu > 0.0 {
        y - 1.0
    } else if mu < 0.0 {
        y
    } else {
        0.0
    };
    y_factor * mu - (-mu.abs()).exp().ln_1p()
}

fn log_likelihood_slope(y: f64, mu: f64) -> f64 {
    let mu_factor = if mu > 0.0 { 1.0 } else { mu.exp() };
    y - mu_factor / (1.0 + (-mu.abs()).exp())
}

impl SmoothFunction for SmoothLogLLogistic {
    fn evaluate(&self, mu: &DistVector, mode: EvalMode) -> SfResult<Evaluation<DistVector>> {
        if mode.is_empty() {
            return Ok(Evaluation::empty());
        }
        debug!(function = self.name(), %mode, elements = mu.len(), "evaluating");

        let value = if mode.value {
            Some(self.y.zip_aggregate(
                mu,
                0.0,
                |acc, y, m| acc + log_likelihood(y, m),
                |a, b| a + b,
            )?)
        } else {
            None
        };

        let gradient = if mode.gradient {
            Some(self.y.zip_with(mu, log_likelihood_slope)?)
        } else {
            None
        };

        Ok(Evaluation::new(value, gradient))
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}
