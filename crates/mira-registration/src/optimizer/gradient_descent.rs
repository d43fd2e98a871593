//! Regular-step gradient descent optimizer.

use std::time::Instant;

use tracing::debug;

use super::trait_::{CostFunction, Optimizer, OptimizerOutcome, StopCondition};
use crate::error::{RegistrationError, Result};
use crate::progress::{ProgressCallback, ProgressInfo};

/// Gradient descent that walks a fixed step along the normalized negative
/// gradient, shrinking the step whenever the gradient direction reverses.
///
/// Gradients are estimated by central finite differences, so the cost
/// function only has to provide values. The run stops when the step
/// length drops below `minimum_step_length` or the iteration budget is
/// exhausted, and always reports the best parameters seen.
#[derive(Debug, Clone)]
pub struct RegularStepGradientDescent {
    max_iterations: usize,
    initial_step_length: f64,
    relaxation_factor: f64,
    minimum_step_length: f64,
    gradient_delta: f64,
}

impl RegularStepGradientDescent {
    pub fn new(
        max_iterations: usize,
        initial_step_length: f64,
        relaxation_factor: f64,
        minimum_step_length: f64,
    ) -> Self {
        Self {
            max_iterations,
            initial_step_length,
            relaxation_factor,
            minimum_step_length,
            gradient_delta: 1e-4,
        }
    }

    fn gradient(&self, cost: &dyn CostFunction, parameters: &[f64]) -> Result<Vec<f64>> {
        let mut gradient = vec![0.0; parameters.len()];
        let mut probe = parameters.to_vec();
        for i in 0..parameters.len() {
            probe[i] = parameters[i] + self.gradient_delta;
            let forward = cost.value(&probe)?;
            probe[i] = parameters[i] - self.gradient_delta;
            let backward = cost.value(&probe)?;
            probe[i] = parameters[i];
            gradient[i] = (forward - backward) / (2.0 * self.gradient_delta);
        }
        Ok(gradient)
    }
}

impl Optimizer for RegularStepGradientDescent {
    fn optimize(
        &self,
        cost: &dyn CostFunction,
        initial: &[f64],
        callback: Option<&dyn ProgressCallback>,
    ) -> Result<OptimizerOutcome> {
        let start = Instant::now();
        if let Some(cb) = callback {
            cb.on_start();
        }

        let mut parameters = initial.to_vec();
        let mut value = cost.value(&parameters)?;
        if !value.is_finite() {
            return Err(RegistrationError::numerical_instability(
                "cost is not finite at the initial parameters",
            ));
        }

        let mut best_parameters = parameters.clone();
        let mut best_value = value;
        let mut step_length = self.initial_step_length;
        let mut previous_gradient: Option<Vec<f64>> = None;
        let mut iterations = 0usize;
        let mut stop_condition = StopCondition::MaximumIterations;

        for iteration in 1..=self.max_iterations {
            let gradient = self.gradient(cost, &parameters)?;
            let magnitude = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            if magnitude < f64::EPSILON {
                iterations = iteration;
                stop_condition = StopCondition::Converged;
                break;
            }

            // A sign flip in the descent direction means we overshot the
            // minimum; relax the step before continuing.
            if let Some(prev) = &previous_gradient {
                let dot: f64 = gradient.iter().zip(prev.iter()).map(|(a, b)| a * b).sum();
                if dot < 0.0 {
                    step_length *= self.relaxation_factor;
                }
            }

            if step_length < self.minimum_step_length {
                iterations = iteration;
                stop_condition = StopCondition::Converged;
                break;
            }

            for (p, g) in parameters.iter_mut().zip(gradient.iter()) {
                *p -= step_length * g / magnitude;
            }
            value = cost.value(&parameters)?;
            if !value.is_finite() {
                return Err(RegistrationError::numerical_instability(
                    "cost became non-finite during descent",
                ));
            }
            if value < best_value {
                best_value = value;
                best_parameters = parameters.clone();
            }

            previous_gradient = Some(gradient);
            iterations = iteration;

            if let Some(cb) = callback {
                cb.on_iteration(&ProgressInfo {
                    iteration,
                    metric_value: value,
                    step_length,
                    elapsed: start.elapsed(),
                });
            }
        }

        debug!(
            iterations,
            final_value = best_value,
            %stop_condition,
            "gradient descent finished"
        );
        if let Some(cb) = callback {
            cb.on_complete();
        }

        Ok(OptimizerOutcome {
            parameters: best_parameters,
            final_value: best_value,
            iterations,
            stop_condition,
        })
    }
}
