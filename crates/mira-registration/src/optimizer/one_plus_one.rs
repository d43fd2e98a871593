//! (1+1) evolutionary optimizer.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use super::trait_::{CostFunction, Optimizer, OptimizerOutcome, StopCondition};
use crate::error::{RegistrationError, Result};
use crate::progress::{ProgressCallback, ProgressInfo};

const DEFAULT_SEED: u64 = 12345;
const GROWTH_FACTOR: f64 = 1.05;

/// Derivative-free (1+1) evolution strategy.
///
/// Each iteration perturbs the current parameters with an isotropic
/// Gaussian mutation scaled by the search radius. Improvements are
/// accepted and grow the radius; failures shrink it. The run stops when
/// the radius falls below `epsilon` or the iteration budget runs out.
///
/// The random stream is seeded with a fixed value so repeated runs on the
/// same inputs produce identical results.
#[derive(Debug, Clone)]
pub struct OnePlusOneEvolutionary {
    max_iterations: usize,
    initial_radius: f64,
    epsilon: f64,
    seed: u64,
}

impl OnePlusOneEvolutionary {
    pub fn new(max_iterations: usize, initial_radius: f64, epsilon: f64) -> Self {
        Self {
            max_iterations,
            initial_radius,
            epsilon,
            seed: DEFAULT_SEED,
        }
    }

    /// Override the random seed (tests only need the default).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Optimizer for OnePlusOneEvolutionary {
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

        let mut rng = StdRng::seed_from_u64(self.seed);
        let shrink_factor = GROWTH_FACTOR.powf(-0.25);

        let mut parameters = initial.to_vec();
        let mut value = cost.value(&parameters)?;
        if !value.is_finite() {
            return Err(RegistrationError::numerical_instability(
                "cost is not finite at the initial parameters",
            ));
        }

        let mut radius = self.initial_radius;
        let mut iterations = 0usize;
        let mut stop_condition = StopCondition::MaximumIterations;

        for iteration in 1..=self.max_iterations {
            if radius < self.epsilon {
                iterations = iteration;
                stop_condition = StopCondition::Converged;
                break;
            }

            let candidate: Vec<f64> = parameters
                .iter()
                .map(|p| p + radius * rng.sample::<f64, _>(StandardNormal))
                .collect();

            // A candidate that leaves the valid metric domain counts as a
            // failed mutation rather than aborting the run.
            match cost.value(&candidate) {
                Ok(candidate_value) if candidate_value < value => {
                    parameters = candidate;
                    value = candidate_value;
                    radius *= GROWTH_FACTOR;
                }
                Ok(_) | Err(RegistrationError::MetricError(_)) => {
                    radius *= shrink_factor;
                }
                Err(e) => return Err(e),
            }

            iterations = iteration;
            if let Some(cb) = callback {
                cb.on_iteration(&ProgressInfo {
                    iteration,
                    metric_value: value,
                    step_length: radius,
                    elapsed: start.elapsed(),
                });
            }
        }

        debug!(
            iterations,
            final_value = value,
            %stop_condition,
            "evolutionary optimization finished"
        );
        if let Some(cb) = callback {
            cb.on_complete();
        }

        Ok(OptimizerOutcome {
            parameters,
            final_value: value,
            iterations,
            stop_condition,
        })
    }
}
