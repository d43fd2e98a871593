//! Rigid registration of one moving volume onto a fixed volume, with
//! optional landmark-based evaluation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use mira_cli::{init_tracing, register_pair, write_registered_volume, CliMode};
use mira_eval::{evaluate, read_landmarks, report};
use mira_registration::RegistrationParameters;

#[derive(Parser)]
#[command(name = "mira")]
#[command(about = "Rigid registration of 3-D medical volumes")]
struct Cli {
    /// Fixed (reference) volume
    fixed: PathBuf,

    /// Moving volume to register onto the fixed one
    moving: PathBuf,

    /// Output path for the registered volume
    output: PathBuf,

    /// Registration mode
    #[arg(long, value_enum, default_value = "multi")]
    mode: CliMode,

    /// Iteration cap per pyramid level
    #[arg(long)]
    iterations: Option<usize>,

    /// Number of multi-resolution pyramid levels
    #[arg(long)]
    pyramid_levels: Option<usize>,

    /// Initial gradient descent step length
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Step relaxation factor on gradient reversal
    #[arg(long)]
    relaxation: Option<f64>,

    /// Save the final transform to this file
    #[arg(long)]
    save_transform: Option<PathBuf>,

    /// Landmarks in the fixed image (one x,y,z per line)
    #[arg(long)]
    fixed_landmarks: Option<PathBuf>,

    /// Corresponding landmarks in the moving image
    #[arg(long)]
    moving_landmarks: Option<PathBuf>,

    /// Write the before/after evaluation summary CSV here
    #[arg(long)]
    eval_output: Option<PathBuf>,

    /// Write the per-landmark error CSV here
    #[arg(long)]
    per_landmark_output: Option<PathBuf>,

    /// Per-iteration progress output
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let fixed = mira_io::read_nifti(&cli.fixed)
        .with_context(|| format!("failed to load fixed image {}", cli.fixed.display()))?;
    let moving = mira_io::read_nifti(&cli.moving)
        .with_context(|| format!("failed to load moving image {}", cli.moving.display()))?;
    info!(
        fixed = %cli.fixed.display(),
        moving = %cli.moving.display(),
        "loaded volumes"
    );

    let landmarks = match (&cli.fixed_landmarks, &cli.moving_landmarks) {
        (Some(fixed_path), Some(moving_path)) => {
            let fixed_landmarks = read_landmarks(fixed_path)
                .with_context(|| format!("failed to read {}", fixed_path.display()))?;
            let moving_landmarks = read_landmarks(moving_path)
                .with_context(|| format!("failed to read {}", moving_path.display()))?;
            Some((fixed_landmarks, moving_landmarks))
        }
        (None, None) => None,
        _ => bail!("--fixed-landmarks and --moving-landmarks must be given together"),
    };

    let before = match &landmarks {
        Some((fixed_landmarks, moving_landmarks)) => {
            let result = evaluate(fixed_landmarks, moving_landmarks, None)?;
            info!(
                mean_tre = result.mean_error,
                landmarks = result.num_landmarks,
                "initial alignment error"
            );
            Some(result)
        }
        None => None,
    };

    let mut parameters = RegistrationParameters {
        verbose: cli.verbose,
        ..Default::default()
    };
    if let Some(iterations) = cli.iterations {
        parameters.max_iterations = iterations;
    }
    if let Some(levels) = cli.pyramid_levels {
        parameters.pyramid_levels = levels;
    }
    if let Some(learning_rate) = cli.learning_rate {
        parameters.learning_rate = learning_rate;
    }
    if let Some(relaxation) = cli.relaxation {
        parameters.relaxation_factor = relaxation;
    }

    let outcome = register_pair(&fixed, &moving, cli.mode.into(), parameters)?;
    info!(
        iterations = outcome.iterations,
        metric = outcome.final_metric_value,
        elapsed_seconds = outcome.elapsed_seconds,
        "registration finished"
    );

    if let Some((fixed_landmarks, moving_landmarks)) = &landmarks {
        let after = evaluate(fixed_landmarks, moving_landmarks, Some(&outcome.transform))?;
        info!(mean_tre = after.mean_error, "post-registration error");

        if let Some(path) = &cli.eval_output {
            let before = before.as_ref().expect("before-TRE computed with landmarks");
            report::write_summary_csv(path, before, &after)?;
            info!(path = %path.display(), "wrote evaluation summary");
        }
        if let Some(path) = &cli.per_landmark_output {
            report::write_per_landmark_csv(path, &after)?;
            info!(path = %path.display(), "wrote per-landmark errors");
        }
    } else if cli.eval_output.is_some() || cli.per_landmark_output.is_some() {
        bail!("evaluation output requires --fixed-landmarks and --moving-landmarks");
    }

    write_registered_volume(&cli.output, &fixed, &moving, &outcome)?;
    info!(path = %cli.output.display(), "wrote registered volume");

    if let Some(path) = &cli.save_transform {
        mira_io::write_transform(path, &outcome.transform)?;
        info!(path = %path.display(), "wrote transform");
    }

    Ok(())
}
