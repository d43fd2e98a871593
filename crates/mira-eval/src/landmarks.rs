//! Landmark file reading and writing.
//!
//! A landmark file is plain text with one `x,y,z` physical coordinate per
//! line. Blank lines and lines starting with `#` are ignored. Malformed
//! lines are logged and skipped rather than rejecting the whole file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use mira_core::spatial::Point3;

use crate::error::{EvalError, Result};

/// Read landmarks from a text file.
pub fn read_landmarks(path: impl AsRef<Path>) -> Result<Vec<Point3>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut landmarks = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_landmark(trimmed) {
            Some(point) => landmarks.push(point),
            None => warn!(
                path = %path.display(),
                line = line_number + 1,
                content = trimmed,
                "skipping malformed landmark line"
            ),
        }
    }

    Ok(landmarks)
}

/// Write landmarks as one `x,y,z` line each.
pub fn write_landmarks(path: impl AsRef<Path>, landmarks: &[Point3]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for point in landmarks {
        writeln!(writer, "{},{},{}", point[0], point[1], point[2])?;
    }
    writer.flush()?;
    Ok(())
}

/// Check that a landmark file exists and contains at least one valid
/// landmark.
pub fn validate_landmarks_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let landmarks = read_landmarks(path)?;
    if landmarks.is_empty() {
        return Err(EvalError::EmptyLandmarkFile {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn parse_landmark(line: &str) -> Option<Point3> {
    let mut coords = [0.0f64; 3];
    let mut count = 0;
    for token in line.split(',') {
        if count == 3 {
            return None;
        }
        coords[count] = token.trim().parse().ok()?;
        count += 1;
    }
    if count != 3 {
        return None;
    }
    Some(Point3::new(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn landmark_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_simple_file() {
        let file = landmark_file("1.0,2.0,3.0\n4.5,-5.5,6.0\n");
        let landmarks = read_landmarks(file.path()).unwrap();
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks[0], Point3::new([1.0, 2.0, 3.0]));
        assert_eq!(landmarks[1], Point3::new([4.5, -5.5, 6.0]));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let file = landmark_file("# header\n\n1,2,3\n\n# trailing\n");
        let landmarks = read_landmarks(file.path()).unwrap();
        assert_eq!(landmarks.len(), 1);
    }

    #[test]
    fn test_malformed_lines_discarded_not_fatal() {
        let file = landmark_file("1,2,3\nnot,a,number\n4,5\n7,8,9,10\n4,5,6\n");
        let landmarks = read_landmarks(file.path()).unwrap();
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks[1], Point3::new([4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_whitespace_around_coordinates() {
        let file = landmark_file(" 1.0 , 2.0 , 3.0 \n");
        let landmarks = read_landmarks(file.path()).unwrap();
        assert_eq!(landmarks, vec![Point3::new([1.0, 2.0, 3.0])]);
    }

    #[test]
    fn test_roundtrip() {
        let points = vec![
            Point3::new([1.25, -2.5, 3.75]),
            Point3::new([0.0, 0.0, 0.0]),
        ];
        let file = NamedTempFile::new().unwrap();
        write_landmarks(file.path(), &points).unwrap();
        assert_eq!(read_landmarks(file.path()).unwrap(), points);
    }

    #[test]
    fn test_validate_rejects_comment_only_file() {
        let file = landmark_file("# only comments\n# here\n");
        assert!(matches!(
            validate_landmarks_file(file.path()),
            Err(EvalError::EmptyLandmarkFile { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            read_landmarks("/nonexistent/landmarks.txt"),
            Err(EvalError::Io(_))
        ));
    }
}
