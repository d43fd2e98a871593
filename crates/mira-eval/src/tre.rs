//! Target registration error over corresponding landmark pairs.

use mira_core::spatial::Point3;
use mira_core::transform::Transform;

use crate::error::{EvalError, Result};

/// Summary statistics plus per-landmark errors, all in mm.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkEvaluationResult {
    pub mean_error: f64,
    pub std_error: f64,
    pub min_error: f64,
    pub max_error: f64,
    pub median_error: f64,
    /// Errors in landmark input order.
    pub per_landmark_errors: Vec<f64>,
    pub num_landmarks: usize,
}

impl LandmarkEvaluationResult {
    fn empty() -> Self {
        Self {
            mean_error: 0.0,
            std_error: 0.0,
            min_error: 0.0,
            max_error: 0.0,
            median_error: 0.0,
            per_landmark_errors: Vec::new(),
            num_landmarks: 0,
        }
    }
}

/// Compute target registration error between corresponding landmarks.
///
/// Landmarks correspond by index. Each moving landmark is mapped through
/// `transform` when one is given (pass `None` to measure the initial,
/// pre-registration error), then its Euclidean distance to the fixed
/// landmark at the same index is recorded.
///
/// Lists of different lengths are an error; empty lists produce an
/// all-zero result.
pub fn evaluate(
    fixed: &[Point3],
    moving: &[Point3],
    transform: Option<&dyn Transform>,
) -> Result<LandmarkEvaluationResult> {
    if fixed.len() != moving.len() {
        return Err(EvalError::LandmarkCountMismatch {
            fixed: fixed.len(),
            moving: moving.len(),
        });
    }
    if fixed.is_empty() {
        return Ok(LandmarkEvaluationResult::empty());
    }

    let errors: Vec<f64> = fixed
        .iter()
        .zip(moving.iter())
        .map(|(f, m)| {
            let predicted = match transform {
                Some(t) => t.transform_point(m),
                None => *m,
            };
            (predicted - *f).norm()
        })
        .collect();

    Ok(compute_statistics(errors))
}

fn compute_statistics(errors: Vec<f64>) -> LandmarkEvaluationResult {
    let n = errors.len();
    let mean = errors.iter().sum::<f64>() / n as f64;
    // Population variance: these landmarks are the whole set of interest,
    // not a sample from a larger one.
    let variance = errors.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / n as f64;

    let mut sorted = errors.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("errors are finite"));
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    LandmarkEvaluationResult {
        mean_error: mean,
        std_error: variance.sqrt(),
        min_error: sorted[0],
        max_error: sorted[n - 1],
        median_error: median,
        per_landmark_errors: errors,
        num_landmarks: n,
    }
}
