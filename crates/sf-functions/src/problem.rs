//! JSON-described evaluation problems.
//!
//! A problem names a smooth function with its reference data, a candidate
//! point, the partitioning to run with, and the outputs to compute:
//!
//! ```json
//! {
//!   "partitions": { "num_partitions": 4, "tree_depth": 2 },
//!   "function": { "kind": "huber", "reference": [0.0, 0.0], "tau": 1.0 },
//!   "point": [0.5, 2.0],
//!   "mode": { "value": true, "gradient": true }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sf_types::{validation_error, EvalMode, SfResult};
use sf_vector::{DistVector, PartitionConfig};
use tracing::info;

use crate::function::SmoothFunction;
use crate::huber::SmoothHuber;
use crate::logistic::SmoothLogLLogistic;
use crate::quad::SmoothQuad;

/// Which smooth function to build, with its reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FunctionSpec {
    Quadratic { reference: Vec<f64> },
    Huber { reference: Vec<f64>, tau: f64 },
    Logistic { observed: Vec<f64> },
}

impl FunctionSpec {
    pub fn build(&self, config: &PartitionConfig) -> SfResult<Box<dyn SmoothFunction>> {
        config.validate()?;
        let function: Box<dyn SmoothFunction> = match self {
            Self::Quadratic { reference } => Box::new(SmoothQuad::with_config(
                DistVector::from_vec_with(reference.clone(), config)?,
                config,
            )?),
            Self::Huber { reference, tau } => Box::new(SmoothHuber::new(
                DistVector::from_vec_with(reference.clone(), config)?,
                *tau,
            )?),
            Self::Logistic { observed } => Box::new(SmoothLogLLogistic::new(
                DistVector::from_vec_with(observed.clone(), config)?,
            )),
        };
        Ok(function)
    }
}

/// A single evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    #[serde(default)]
    pub partitions: PartitionConfig,

    pub function: FunctionSpec,

    /// Candidate vector (`x` or the linear predictor `mu`).
    pub point: Vec<f64>,

    #[serde(default)]
    pub mode: EvalMode,
}

impl ProblemConfig {
    pub fn from_json_str(json: &str) -> SfResult<Self> {
        let problem: Self = serde_json::from_str(json)?;
        problem.validate()?;
        Ok(problem)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SfResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> SfResult<()> {
        self.partitions.validate()?;
        if self.point.is_empty() {
            return Err(validation_error!("point must not be empty"));
        }
        Ok(())
    }

    /// Build the function and evaluate it once at `point`.
    pub fn run(&self) -> SfResult<EvaluationReport> {
        let function = self.function.build(&self.partitions)?;
        let x = DistVector::from_vec_with(self.point.clone(), &self.partitions)?;

        info!(
            function = function.name(),
            mode = %self.mode,
            elements = x.len(),
            partitions = x.num_partitions(),
            "running evaluation"
        );

        let evaluation = function
            .evaluate(&x, self.mode)?
            .map_gradient(|g| Ok(g.collect()))?;

        Ok(EvaluationReport {
            function: function.name().to_string(),
            mode: self.mode,
            value: evaluation.value,
            gradient: evaluation.gradient,
        })
    }
}

/// Dense outcome of [`ProblemConfig::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub function: String,
    pub mode: EvalMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Vec<f64>>,
}
