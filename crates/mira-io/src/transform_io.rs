//! ITK-style text transform file reading and writing.
//!
//! The format is the plain-text "Insight Transform File V1.0": a header
//! comment, the transform class name, six optimizable parameters, and the
//! fixed center of rotation as fixed parameters.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use mira_core::spatial::{Point3, Vector3};
use mira_core::transform::{EulerTransform, Transform};

const HEADER: &str = "#Insight Transform File V1.0";
const TRANSFORM_CLASS: &str = "Euler3DTransform_double_3_3";

/// Write a rigid transform to a transform file.
pub fn write_transform(path: impl AsRef<Path>, transform: &EulerTransform) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create transform file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let p = transform.parameters();
    let c = transform.center();
    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "#Transform 0")?;
    writeln!(writer, "Transform: {TRANSFORM_CLASS}")?;
    writeln!(
        writer,
        "Parameters: {} {} {} {} {} {}",
        p[0], p[1], p[2], p[3], p[4], p[5]
    )?;
    writeln!(writer, "FixedParameters: {} {} {}", c[0], c[1], c[2])?;
    writer.flush()?;
    Ok(())
}

/// Read a rigid transform from a transform file.
pub fn read_transform(path: impl AsRef<Path>) -> Result<EulerTransform> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open transform file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut class: Option<String> = None;
    let mut parameters: Option<Vec<f64>> = None;
    let mut fixed_parameters: Option<Vec<f64>> = None;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Transform:") {
            class = Some(rest.trim().to_string());
        } else if let Some(rest) = trimmed.strip_prefix("Parameters:") {
            parameters = Some(parse_floats(rest)?);
        } else if let Some(rest) = trimmed.strip_prefix("FixedParameters:") {
            fixed_parameters = Some(parse_floats(rest)?);
        }
    }

    let class = class.context("transform file has no Transform line")?;
    if class != TRANSFORM_CLASS {
        bail!("unsupported transform class {class}");
    }
    let parameters = parameters.context("transform file has no Parameters line")?;
    if parameters.len() != 6 {
        bail!("expected 6 parameters, found {}", parameters.len());
    }
    let fixed = fixed_parameters.context("transform file has no FixedParameters line")?;
    if fixed.len() != 3 {
        bail!("expected 3 fixed parameters, found {}", fixed.len());
    }

    Ok(EulerTransform::new(
        [parameters[0], parameters[1], parameters[2]],
        Vector3::new([parameters[3], parameters[4], parameters[5]]),
        Point3::new([fixed[0], fixed[1], fixed[2]]),
    ))
}

fn parse_floats(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid number {token:?} in transform file"))
        })
        .collect()
}
