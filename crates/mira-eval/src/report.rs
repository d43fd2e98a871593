//! CSV report output for evaluation results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::tre::LandmarkEvaluationResult;

/// Write the before/after summary CSV.
///
/// One row per statistic with `Improvement = Before - After`, six-decimal
/// fixed format throughout.
pub fn write_summary_csv(
    path: impl AsRef<Path>,
    before: &LandmarkEvaluationResult,
    after: &LandmarkEvaluationResult,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "Metric,Before,After,Improvement")?;

    let rows = [
        ("Mean TRE (mm)", before.mean_error, after.mean_error),
        ("Std Dev (mm)", before.std_error, after.std_error),
        ("Median TRE (mm)", before.median_error, after.median_error),
        ("Min TRE (mm)", before.min_error, after.min_error),
        ("Max TRE (mm)", before.max_error, after.max_error),
    ];
    for (name, before_value, after_value) in rows {
        writeln!(
            writer,
            "{name},{before_value:.6},{after_value:.6},{:.6}",
            before_value - after_value
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the per-landmark error CSV, one zero-indexed row per landmark in
/// input order.
pub fn write_per_landmark_csv(
    path: impl AsRef<Path>,
    result: &LandmarkEvaluationResult,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "Landmark,Error (mm)")?;
    for (index, error) in result.per_landmark_errors.iter().enumerate() {
        writeln!(writer, "{index},{error:.6}")?;
    }
    writer.flush()?;
    Ok(())
}
