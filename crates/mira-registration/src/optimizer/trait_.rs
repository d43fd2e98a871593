//! Optimizer and cost function traits.

use crate::error::Result;
use crate::progress::ProgressCallback;

/// Scalar cost over a flat parameter vector.
///
/// Registration wraps a metric, a transform, and an image pair into one
/// of these so that optimizers stay independent of image semantics.
pub trait CostFunction {
    /// Evaluate the cost at the given parameters.
    fn value(&self, parameters: &[f64]) -> Result<f64>;
}

impl<F> CostFunction for F
where
    F: Fn(&[f64]) -> Result<f64>,
{
    fn value(&self, parameters: &[f64]) -> Result<f64> {
        self(parameters)
    }
}

/// Why an optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Step length (or search radius) fell below the configured minimum.
    Converged,
    /// Iteration budget exhausted.
    MaximumIterations,
}

impl std::fmt::Display for StopCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::MaximumIterations => write!(f, "maximum iterations reached"),
        }
    }
}

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerOutcome {
    /// Best parameters found.
    pub parameters: Vec<f64>,
    /// Cost value at the best parameters.
    pub final_value: f64,
    /// Iterations actually performed.
    pub iterations: usize,
    /// Why the run stopped.
    pub stop_condition: StopCondition,
}

/// Iterative minimizer of a [`CostFunction`].
pub trait Optimizer {
    /// Minimize `cost` starting from `initial`, reporting progress to
    /// `callback` if one is supplied.
    fn optimize(
        &self,
        cost: &dyn CostFunction,
        initial: &[f64],
        callback: Option<&dyn ProgressCallback>,
    ) -> Result<OptimizerOutcome>;
}
