//! # sf-functions
//!
//! Smooth objective functions for first-order convex solvers.
//!
//! Every function implements [`SmoothFunction`]: evaluate at a partitioned
//! candidate vector under an [`EvalMode`](sf_types::EvalMode), computing only
//! the requested value and/or gradient. Reference data is pinned once at
//! construction; a residual shared by the value and the gradient is pinned for
//! the duration of a call that needs both.

mod function;
mod huber;
mod logistic;
mod problem;
mod quad;

pub use function::SmoothFunction;
pub use huber::SmoothHuber;
pub use logistic::SmoothLogLLogistic;
pub use problem::{EvaluationReport, FunctionSpec, ProblemConfig};
pub use quad::SmoothQuad;
