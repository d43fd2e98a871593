//! Registration orchestration: pyramid schedule, initialization, metric
//! and optimizer selection, and the coarse-to-fine level loop.

use std::time::Instant;

use tracing::{info, warn};

use mira_core::filter::ImagePyramid;
use mira_core::transform::{EulerTransform, Transform};
use mira_core::Image;

use crate::error::{RegistrationError, Result};
use crate::initializer::center_initializer;
use crate::metric::{MeanSquaresMetric, Metric, MutualInformationMetric};
use crate::optimizer::{
    CostFunction, OnePlusOneEvolutionary, Optimizer, RegularStepGradientDescent,
};
use crate::progress::ProgressCallback;
use crate::pyramid::PyramidSchedule;

const MUTUAL_INFORMATION_BINS: usize = 50;
const EVOLUTIONARY_EPSILON: f64 = 1e-6;

/// Which metric/optimizer pairing to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationMode {
    /// Mean squares + regular-step gradient descent, for images of the
    /// same modality. Fully deterministic.
    MonoModal,
    /// Mutual information + (1+1) evolutionary search, robust across
    /// modalities. Deterministic through a fixed random seed.
    #[default]
    MultiModal,
}

impl std::fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonoModal => write!(f, "mono-modal"),
            Self::MultiModal => write!(f, "multi-modal"),
        }
    }
}

/// Tunable parameters shared by both modes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationParameters {
    /// Iteration cap per pyramid level.
    pub max_iterations: usize,
    /// Number of multi-resolution levels.
    pub pyramid_levels: usize,
    /// Initial step length for gradient descent.
    pub learning_rate: f64,
    /// Step relaxation factor applied on gradient direction reversal.
    pub relaxation_factor: f64,
    /// Gradient descent stops once the step falls below this.
    pub min_step_length: f64,
    /// Initial mutation radius for the evolutionary optimizer.
    pub initial_radius: f64,
    /// Emit per-iteration progress to the observer.
    pub verbose: bool,
}

impl Default for RegistrationParameters {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            pyramid_levels: 3,
            learning_rate: 0.001,
            relaxation_factor: 0.95,
            min_step_length: 1e-4,
            initial_radius: 7e-5,
            verbose: false,
        }
    }
}

impl RegistrationParameters {
    fn validate(&self) -> Result<()> {
        if self.pyramid_levels == 0 {
            return Err(RegistrationError::invalid_configuration(
                "pyramid_levels must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Result of one registration run.
///
/// Constructed once at the end of [`Registration::register`]; failures are
/// reported through `success`/`message` with the transform left at the
/// value current when the run stopped.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    /// Transform mapping fixed physical points into the moving image.
    pub transform: EulerTransform,
    /// Metric value at the final parameters.
    pub final_metric_value: f64,
    /// Iterations summed across all pyramid levels.
    pub iterations: usize,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
    /// Whether the run completed normally.
    pub success: bool,
    /// Failure description, empty on success.
    pub message: String,
}

/// Adapts a metric, image pair, and transform shape into a flat-parameter
/// cost for the optimizers.
struct MetricCost<'a> {
    metric: &'a dyn Metric,
    fixed: &'a Image,
    moving: &'a Image,
    template: EulerTransform,
}

impl CostFunction for MetricCost<'_> {
    fn value(&self, parameters: &[f64]) -> Result<f64> {
        let mut transform = self.template.clone();
        transform.set_parameters(parameters);
        self.metric.evaluate(self.fixed, self.moving, &transform)
    }
}

/// Rigid registration driver.
///
/// Owns the image pair and configuration; `register()` may be called
/// repeatedly (e.g. with different parameters) without rebuilding.
pub struct Registration {
    fixed: Option<Image>,
    moving: Option<Image>,
    mode: RegistrationMode,
    parameters: RegistrationParameters,
    callback: Option<Box<dyn ProgressCallback>>,
}

impl Default for Registration {
    fn default() -> Self {
        Self::new()
    }
}

impl Registration {
    pub fn new() -> Self {
        Self {
            fixed: None,
            moving: None,
            mode: RegistrationMode::default(),
            parameters: RegistrationParameters::default(),
            callback: None,
        }
    }

    pub fn set_fixed_image(&mut self, image: Image) {
        self.fixed = Some(image);
    }

    pub fn set_moving_image(&mut self, image: Image) {
        self.moving = Some(image);
    }

    pub fn set_mode(&mut self, mode: RegistrationMode) {
        self.mode = mode;
    }

    pub fn set_parameters(&mut self, parameters: RegistrationParameters) {
        self.parameters = parameters;
    }

    /// Install a progress observer; it only receives per-iteration events
    /// when `verbose` is set.
    pub fn set_progress_callback(&mut self, callback: Box<dyn ProgressCallback>) {
        self.callback = Some(callback);
    }

    /// Run the registration.
    ///
    /// Never panics and never returns a partial error: any failure is
    /// folded into the outcome's `success`/`message` fields.
    pub fn register(&self) -> RegistrationOutcome {
        let start = Instant::now();

        let (fixed, moving) = match (&self.fixed, &self.moving) {
            (Some(fixed), Some(moving)) => (fixed, moving),
            _ => {
                return Self::failure(
                    RegistrationError::ImagesNotLoaded.to_string(),
                    start.elapsed().as_secs_f64(),
                );
            }
        };

        match self.run_engine(fixed, moving, start) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "registration engine failed");
                if let Some(cb) = &self.callback {
                    cb.on_error(&e.to_string());
                }
                Self::failure(
                    format!("Registration failed: {e}"),
                    start.elapsed().as_secs_f64(),
                )
            }
        }
    }

    fn failure(message: String, elapsed_seconds: f64) -> RegistrationOutcome {
        RegistrationOutcome {
            transform: EulerTransform::identity(mira_core::spatial::Point3::origin()),
            final_metric_value: 0.0,
            iterations: 0,
            elapsed_seconds,
            success: false,
            message,
        }
    }

    fn run_engine(
        &self,
        fixed: &Image,
        moving: &Image,
        start: Instant,
    ) -> Result<RegistrationOutcome> {
        self.parameters.validate()?;

        let schedule = PyramidSchedule::new(self.parameters.pyramid_levels)?;
        let fixed_pyramid =
            ImagePyramid::new(fixed, schedule.shrink_factors(), schedule.smoothing_sigmas());
        let moving_pyramid =
            ImagePyramid::new(moving, schedule.shrink_factors(), schedule.smoothing_sigmas());

        let mut transform = center_initializer(fixed, moving);
        info!(
            mode = %self.mode,
            levels = schedule.levels(),
            "starting registration"
        );

        let metric: Box<dyn Metric> = match self.mode {
            RegistrationMode::MonoModal => Box::new(MeanSquaresMetric::new()),
            RegistrationMode::MultiModal => {
                Box::new(MutualInformationMetric::new(MUTUAL_INFORMATION_BINS))
            }
        };
        let optimizer: Box<dyn Optimizer> = match self.mode {
            RegistrationMode::MonoModal => Box::new(RegularStepGradientDescent::new(
                self.parameters.max_iterations,
                self.parameters.learning_rate,
                self.parameters.relaxation_factor,
                self.parameters.min_step_length,
            )),
            RegistrationMode::MultiModal => Box::new(OnePlusOneEvolutionary::new(
                self.parameters.max_iterations,
                self.parameters.initial_radius,
                EVOLUTIONARY_EPSILON,
            )),
        };

        let observer: Option<&dyn ProgressCallback> = if self.parameters.verbose {
            self.callback.as_deref()
        } else {
            None
        };

        let mut total_iterations = 0usize;
        let mut final_value = 0.0f64;

        for level in 0..schedule.levels() {
            let cost = MetricCost {
                metric: metric.as_ref(),
                fixed: fixed_pyramid.level(level),
                moving: moving_pyramid.level(level),
                template: transform.clone(),
            };

            let outcome = optimizer.optimize(&cost, &transform.parameters(), observer)?;
            transform.set_parameters(&outcome.parameters);
            total_iterations += outcome.iterations;
            final_value = outcome.final_value;

            info!(
                level,
                iterations = outcome.iterations,
                metric = final_value,
                stop = %outcome.stop_condition,
                "pyramid level finished"
            );
        }

        Ok(RegistrationOutcome {
            transform,
            final_metric_value: final_value,
            iterations: total_iterations,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            success: true,
            message: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mira_core::spatial::{Direction3, Point3, Spacing3};
    use ndarray::Array3;

    fn blob_image(n: usize, center: [f64; 3]) -> Image {
        let data = Array3::from_shape_fn((n, n, n), |(x, y, z)| {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            let dz = z as f64 - center[2];
            (-(dx * dx + dy * dy + dz * dz) / 8.0).exp() as f32
        });
        Image::new(data, Point3::origin(), Spacing3::ones(), Direction3::identity())
    }

    #[test]
    fn test_register_without_images_fails_cleanly() {
        let registration = Registration::new();
        let outcome = registration.register();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Images not loaded");
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_register_with_only_fixed_image_fails() {
        let mut registration = Registration::new();
        registration.set_fixed_image(blob_image(8, [4.0, 4.0, 4.0]));
        let outcome = registration.register();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Images not loaded");
    }

    #[test]
    fn test_invalid_parameters_become_failed_outcome() {
        let mut registration = Registration::new();
        registration.set_fixed_image(blob_image(8, [4.0, 4.0, 4.0]));
        registration.set_moving_image(blob_image(8, [4.0, 4.0, 4.0]));
        registration.set_parameters(RegistrationParameters {
            pyramid_levels: 0,
            ..Default::default()
        });
        let outcome = registration.register();
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Registration failed:"));
    }

    #[test]
    fn test_default_parameters_are_canonical() {
        let p = RegistrationParameters::default();
        assert_eq!(p.max_iterations, 1000);
        assert_eq!(p.pyramid_levels, 3);
        assert_eq!(p.learning_rate, 0.001);
        assert_eq!(p.relaxation_factor, 0.95);
        assert_eq!(p.min_step_length, 1e-4);
        assert_eq!(p.initial_radius, 7e-5);
        assert!(!p.verbose);
    }

    #[test]
    fn test_mono_modal_reduces_metric_on_shifted_blob() {
        let fixed = blob_image(16, [8.0, 8.0, 8.0]);
        let moving = blob_image(16, [9.5, 8.0, 8.0]);

        let mut registration = Registration::new();
        registration.set_fixed_image(fixed.clone());
        registration.set_moving_image(moving.clone());
        registration.set_mode(RegistrationMode::MonoModal);
        registration.set_parameters(RegistrationParameters {
            max_iterations: 200,
            pyramid_levels: 1,
            learning_rate: 0.2,
            ..Default::default()
        });

        let outcome = registration.register();
        assert!(outcome.success, "message: {}", outcome.message);
        assert!(outcome.iterations > 0);

        let metric = MeanSquaresMetric::new();
        let before = metric
            .evaluate(&fixed, &moving, &EulerTransform::identity(fixed.geometric_center()))
            .unwrap();
        let after = metric.evaluate(&fixed, &moving, &outcome.transform).unwrap();
        assert!(after < before, "after={after} before={before}");
    }

    #[test]
    fn test_multi_modal_runs_to_completion() {
        let fixed = blob_image(8, [4.0, 4.0, 4.0]);
        let moving = blob_image(8, [4.5, 4.0, 4.0]);

        let mut registration = Registration::new();
        registration.set_fixed_image(fixed);
        registration.set_moving_image(moving);
        registration.set_mode(RegistrationMode::MultiModal);
        registration.set_parameters(RegistrationParameters {
            max_iterations: 50,
            pyramid_levels: 1,
            initial_radius: 0.1,
            ..Default::default()
        });

        let outcome = registration.register();
        assert!(outcome.success, "message: {}", outcome.message);
        assert!(outcome.elapsed_seconds >= 0.0);
    }
}
