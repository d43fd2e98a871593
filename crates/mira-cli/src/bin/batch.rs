//! Register every volume in a directory against one fixed volume.
//!
//! A failing item is logged and skipped so the rest of the batch still
//! runs; the exit code is non-zero only for directory-level problems.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info};

use mira_cli::{init_tracing, register_pair, write_registered_volume, CliMode};
use mira_registration::RegistrationParameters;

#[derive(Parser)]
#[command(name = "mira-batch")]
#[command(about = "Register a directory of volumes against one fixed volume")]
struct Cli {
    /// Fixed (reference) volume
    fixed: PathBuf,

    /// Directory of moving volumes
    input_dir: PathBuf,

    /// Directory for registered output volumes
    output_dir: PathBuf,

    /// Registration mode
    #[arg(long, value_enum, default_value = "multi")]
    mode: CliMode,

    /// Iteration cap per pyramid level
    #[arg(long)]
    iterations: Option<usize>,

    /// Number of parallel registration jobs (default: all cores)
    #[arg(long)]
    jobs: Option<usize>,

    /// Per-iteration progress output
    #[arg(long)]
    verbose: bool,
}

fn is_nifti(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".nii") || name.ends_with(".nii.gz")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.input_dir.is_dir() {
        bail!("input directory {} does not exist", cli.input_dir.display());
    }
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure thread pool")?;
    }

    let fixed = mira_io::read_nifti(&cli.fixed)
        .with_context(|| format!("failed to load fixed image {}", cli.fixed.display()))?;

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(&cli.input_dir)
        .with_context(|| format!("failed to read {}", cli.input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_nifti(path))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        bail!("no NIfTI volumes found in {}", cli.input_dir.display());
    }
    info!(count = inputs.len(), "starting batch registration");

    let parameters = RegistrationParameters {
        max_iterations: cli
            .iterations
            .unwrap_or_else(|| RegistrationParameters::default().max_iterations),
        verbose: cli.verbose,
        ..Default::default()
    };
    let mode = cli.mode.into();

    let succeeded: usize = inputs
        .par_iter()
        .map(|input| {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = cli.output_dir.join(&name);

            match register_one(&fixed, input, &output, mode, parameters.clone()) {
                Ok(()) => {
                    info!(volume = name, "registered");
                    1
                }
                Err(e) => {
                    error!(volume = name, error = %e, "skipping failed item");
                    0
                }
            }
        })
        .sum();

    info!(
        succeeded,
        failed = inputs.len() - succeeded,
        "batch complete"
    );
    Ok(())
}

fn register_one(
    fixed: &mira_core::Image,
    input: &Path,
    output: &Path,
    mode: mira_registration::RegistrationMode,
    parameters: RegistrationParameters,
) -> Result<()> {
    let moving = mira_io::read_nifti(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let outcome = register_pair(fixed, &moving, mode, parameters)?;
    write_registered_volume(output, fixed, &moving, &outcome)
}
