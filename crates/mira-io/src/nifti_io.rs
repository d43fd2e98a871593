//! NIfTI volume reading and writing.

use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::SMatrix;
use ndarray::Ix3;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::debug;

use mira_core::spatial::{Direction, Point3, Spacing3};
use mira_core::Image;

/// Read a 3-D NIfTI volume.
///
/// The voxel-to-physical affine is taken from the sform when set, the
/// qform otherwise, falling back to pixdim scaling alone. Spacing is the
/// column norms of the affine's rotation block and the direction matrix
/// is its normalized columns. Voxel data keeps NIfTI's `[x, y, z]` axis
/// order.
pub fn read_nifti(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI file {}", path.display()))?;
    let header = obj.header();

    let affine: [[f32; 4]; 4] = if header.sform_code > 0 {
        [
            header.srow_x,
            header.srow_y,
            header.srow_z,
            [0.0, 0.0, 0.0, 1.0],
        ]
    } else if header.qform_code > 0 {
        // Quaternion form, per the NIfTI-1 standard.
        let b = header.quatern_b;
        let c = header.quatern_c;
        let d = header.quatern_d;
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

        let qfac = if header.pixdim[0] == 0.0 {
            1.0
        } else {
            header.pixdim[0]
        };

        let r11 = a * a + b * b - c * c - d * d;
        let r12 = 2.0 * b * c - 2.0 * a * d;
        let r13 = 2.0 * b * d + 2.0 * a * c;
        let r21 = 2.0 * b * c + 2.0 * a * d;
        let r22 = a * a + c * c - b * b - d * d;
        let r23 = 2.0 * c * d - 2.0 * a * b;
        let r31 = 2.0 * b * d - 2.0 * a * c;
        let r32 = 2.0 * c * d + 2.0 * a * b;
        let r33 = a * a + d * d - c * c - b * b;

        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3] * qfac;

        [
            [r11 * dx, r12 * dy, r13 * dz, header.quatern_x],
            [r21 * dx, r22 * dy, r23 * dz, header.quatern_y],
            [r31 * dx, r32 * dy, r33 * dz, header.quatern_z],
            [0.0, 0.0, 0.0, 1.0],
        ]
    } else {
        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3];
        [
            [dx, 0.0, 0.0, 0.0],
            [0.0, dy, 0.0, 0.0],
            [0.0, 0.0, dz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    };

    let origin = Point3::new([
        affine[0][3] as f64,
        affine[1][3] as f64,
        affine[2][3] as f64,
    ]);

    // Columns of the rotation block carry both spacing and orientation.
    let mut columns = [nalgebra::Vector3::zeros(); 3];
    let mut spacing = [1.0f64; 3];
    for axis in 0..3 {
        let column = nalgebra::Vector3::new(
            affine[0][axis] as f64,
            affine[1][axis] as f64,
            affine[2][axis] as f64,
        );
        let norm = column.norm();
        spacing[axis] = if norm > 1e-9 { norm } else { 1.0 };
        columns[axis] = if norm > 1e-9 {
            column / norm
        } else {
            let mut unit = nalgebra::Vector3::zeros();
            unit[axis] = 1.0;
            unit
        };
    }
    let direction = Direction(SMatrix::from_columns(&columns));

    let volume = obj.into_volume();
    let data = volume
        .into_ndarray::<f32>()
        .context("failed to convert NIfTI volume to ndarray")?
        .into_dimensionality::<Ix3>()
        .context("expected a 3-D NIfTI volume")?;

    debug!(path = %path.display(), shape = ?data.dim(), "read NIfTI volume");
    Ok(Image::new(data, origin, Spacing3::new(spacing), direction))
}

/// Write an image as a NIfTI file.
///
/// The origin, spacing, and direction are carried in the header's sform
/// affine so the volume keeps its physical geometry on disk.
pub fn write_nifti(path: impl AsRef<Path>, image: &Image) -> Result<()> {
    use nifti::writer::WriterOptions;

    let path = path.as_ref();
    let header = build_header(image);
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(image.data())
        .with_context(|| format!("failed to write NIfTI file {}", path.display()))?;
    debug!(path = %path.display(), "wrote NIfTI volume");
    Ok(())
}

/// Header carrying the image's voxel-to-physical affine.
///
/// Row i of the sform is the i-th row of `direction * diag(spacing)` with
/// the origin in the last column, the inverse of the decomposition
/// performed by [`read_nifti`].
fn build_header(image: &Image) -> NiftiHeader {
    let origin = image.origin();
    let spacing = image.spacing();
    let direction = image.direction();

    let mut rows = [[0.0f32; 4]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        for axis in 0..3 {
            row[axis] = (direction[(i, axis)] * spacing[axis]) as f32;
        }
        row[3] = origin[i] as f32;
    }

    let mut pixdim = [0.0f32; 8];
    pixdim[0] = 1.0;
    for axis in 0..3 {
        pixdim[axis + 1] = spacing[axis] as f32;
    }

    NiftiHeader {
        sform_code: 1,
        srow_x: rows[0],
        srow_y: rows[1],
        srow_z: rows[2],
        pixdim,
        ..Default::default()
    }
}
