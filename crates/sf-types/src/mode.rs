//! Evaluation modes: which outputs a smooth function should compute.

use serde::{Deserialize, Serialize};

/// Selects the outputs of a single evaluation.
///
/// Solvers pick the cheapest mode for the step they are taking: gradient only
/// for a descent step, value only for a line-search check, both for a
/// convergence test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvalMode {
    /// Compute the scalar value.
    #[serde(default)]
    pub value: bool,
    /// Compute the gradient vector.
    #[serde(default)]
    pub gradient: bool,
}

impl EvalMode {
    pub const NONE: Self = Self::new(false, false);
    pub const VALUE: Self = Self::new(true, false);
    pub const GRADIENT: Self = Self::new(false, true);
    pub const BOTH: Self = Self::new(true, true);

    pub const fn new(value: bool, gradient: bool) -> Self {
        Self { value, gradient }
    }

    /// Nothing requested; evaluation returns an empty result.
    pub fn is_empty(&self) -> bool {
        !self.value && !self.gradient
    }

    /// Both outputs requested, so shared intermediates are consumed twice.
    pub fn is_both(&self) -> bool {
        self.value && self.gradient
    }
}

impl Default for EvalMode {
    fn default() -> Self {
        Self::BOTH
    }
}

impl std::fmt::Display for EvalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.value, self.gradient) {
            (true, true) => write!(f, "value+gradient"),
            (true, false) => write!(f, "value"),
            (false, true) => write!(f, "gradient"),
            (false, false) => write!(f, "none"),
        }
    }
}
