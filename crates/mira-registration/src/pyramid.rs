//! Multi-resolution pyramid schedule.

use crate::error::{RegistrationError, Result};

/// Per-level shrink factors and smoothing sigmas for a coarse-to-fine run.
///
/// For `L` levels, level `l` (0 = coarsest) uses shrink factor
/// `2^(L-1-l)` and smoothing sigma `L-1-l` mm; four levels give factors
/// `{8, 4, 2, 1}` and sigmas `{3, 2, 1, 0}`. The final level is always the
/// full-resolution, unsmoothed image.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSchedule {
    shrink_factors: Vec<usize>,
    smoothing_sigmas: Vec<f64>,
}

impl PyramidSchedule {
    /// Build a schedule for the given number of levels (>= 1).
    pub fn new(levels: usize) -> Result<Self> {
        if levels == 0 {
            return Err(RegistrationError::invalid_configuration(
                "pyramid must have at least one level",
            ));
        }

        let mut shrink_factors = Vec::with_capacity(levels);
        let mut smoothing_sigmas = Vec::with_capacity(levels);
        for level in 0..levels {
            let exponent = (levels - 1 - level) as u32;
            shrink_factors.push(1usize << exponent);
            smoothing_sigmas.push((levels - 1 - level) as f64);
        }

        Ok(Self {
            shrink_factors,
            smoothing_sigmas,
        })
    }

    /// Number of levels.
    pub fn levels(&self) -> usize {
        self.shrink_factors.len()
    }

    /// Shrink factors, coarsest first.
    pub fn shrink_factors(&self) -> &[usize] {
        &self.shrink_factors
    }

    /// Smoothing sigmas (mm), coarsest first.
    pub fn smoothing_sigmas(&self) -> &[f64] {
        &self.smoothing_sigmas
    }
}
