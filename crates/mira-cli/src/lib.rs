//! Shared plumbing for the `mira` and `mira-batch` binaries.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use mira_core::filter::ResampleFilter;
use mira_core::Image;
use mira_registration::{
    ConsoleProgressCallback, Registration, RegistrationMode, RegistrationOutcome,
    RegistrationParameters,
};

/// Registration mode as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Mean squares metric with gradient descent.
    Mono,
    /// Mutual information metric with evolutionary search.
    Multi,
}

impl From<CliMode> for RegistrationMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Mono => RegistrationMode::MonoModal,
            CliMode::Multi => RegistrationMode::MultiModal,
        }
    }
}

/// Initialize tracing, honoring `RUST_LOG` when set.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Register a moving image onto a fixed one, converting a failed outcome
/// into an error.
pub fn register_pair(
    fixed: &Image,
    moving: &Image,
    mode: RegistrationMode,
    parameters: RegistrationParameters,
) -> Result<RegistrationOutcome> {
    let verbose = parameters.verbose;
    let mut registration = Registration::new();
    registration.set_fixed_image(fixed.clone());
    registration.set_moving_image(moving.clone());
    registration.set_mode(mode);
    registration.set_parameters(parameters);
    if verbose {
        registration.set_progress_callback(Box::new(ConsoleProgressCallback::new()));
    }

    let outcome = registration.register();
    if !outcome.success {
        bail!("{}", outcome.message);
    }
    Ok(outcome)
}

/// Resample the moving image onto the fixed grid and write the result.
pub fn write_registered_volume(
    path: impl AsRef<Path>,
    fixed: &Image,
    moving: &Image,
    outcome: &RegistrationOutcome,
) -> Result<()> {
    let resampled = ResampleFilter::new().apply(moving, fixed, &outcome.transform);
    mira_io::write_nifti(path.as_ref(), &resampled)
        .with_context(|| format!("failed to write {}", path.as_ref().display()))
}
