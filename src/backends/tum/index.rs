// SPDX-License-Identifier: GPL-3.0-only

//! Parsers for the TUM RGB-D text index files
//!
//! All three files share the same shape: `#` comment lines followed by
//! whitespace-separated records starting with a timestamp in seconds.

use crate::backends::types::{BackendError, BackendResult};
use glam::{Mat4, Quat, Vec3};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One line of `depth.txt` or `rgb.txt`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub timestamp: f64,
    /// Path relative to the dataset root
    pub file: PathBuf,
}

/// One line of `groundtruth.txt`, converted to a matrix
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEntry {
    pub timestamp: f64,
    /// Inverse of the recorded camera pose (world to camera)
    pub trajectory: Mat4,
}

fn records(contents: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    contents
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| (n, line.split_whitespace().collect()))
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    name: &str,
    line: usize,
    source: &Path,
) -> BackendResult<T> {
    field.parse().map_err(|_| {
        BackendError::InitializationFailed(format!(
            "{}:{}: invalid {} '{}'",
            source.display(),
            line,
            name,
            field
        ))
    })
}

/// Parse an image list (`timestamp filename`)
pub fn parse_image_list(contents: &str, source: &Path) -> BackendResult<Vec<ImageEntry>> {
    records(contents)
        .map(|(line, fields)| {
            if fields.len() < 2 {
                return Err(BackendError::InitializationFailed(format!(
                    "{}:{}: expected 'timestamp filename'",
                    source.display(),
                    line
                )));
            }
            Ok(ImageEntry {
                timestamp: parse_field(fields[0], "timestamp", line, source)?,
                file: PathBuf::from(fields[1]),
            })
        })
        .collect()
}

/// Parse a trajectory (`timestamp tx ty tz qx qy qz qw`)
///
/// Reading stops at the first record with a zero quaternion.
pub fn parse_trajectory(contents: &str, source: &Path) -> BackendResult<Vec<PoseEntry>> {
    let mut poses = Vec::new();

    for (line, fields) in records(contents) {
        if fields.len() < 8 {
            return Err(BackendError::InitializationFailed(format!(
                "{}:{}: expected 'timestamp tx ty tz qx qy qz qw'",
                source.display(),
                line
            )));
        }

        let mut values = [0.0f32; 7];
        for (value, field) in values.iter_mut().zip(&fields[1..8]) {
            *value = parse_field(field, "pose component", line, source)?;
        }
        let [tx, ty, tz, qx, qy, qz, qw] = values;

        let rotation = Quat::from_xyzw(qx, qy, qz, qw);
        if rotation.length_squared() == 0.0 {
            warn!(line, path = %source.display(), "Zero quaternion, ignoring rest of trajectory");
            break;
        }

        let pose = Mat4::from_rotation_translation(rotation.normalize(), Vec3::new(tx, ty, tz));
        poses.push(PoseEntry {
            timestamp: parse_field(fields[0], "timestamp", line, source)?,
            trajectory: pose.inverse(),
        });
    }

    Ok(poses)
}

/// Index of the pose closest in time to `timestamp`
///
/// Ties resolve to the earliest entry. Returns `None` for an empty list.
pub fn nearest_pose(poses: &[PoseEntry], timestamp: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, pose) in poses.iter().enumerate() {
        let distance = (pose.timestamp - timestamp).abs();
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src() -> &'static Path {
        Path::new("test.txt")
    }

    #[test]
    fn test_image_list_skips_comments() {
        let contents = "# depth maps\n# file: 'x.bag'\n# timestamp filename\n\
                        1305031102.160407 depth/1305031102.160407.png\n\
                        1305031102.194330 depth/1305031102.194330.png\n";
        let entries = parse_image_list(contents, src()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file, PathBuf::from("depth/1305031102.160407.png"));
        assert!((entries[1].timestamp - 1305031102.194330).abs() < 1e-6);
    }

    #[test]
    fn test_image_list_rejects_missing_filename() {
        let err = parse_image_list("1.0\n", src()).unwrap_err();
        assert!(matches!(err, BackendError::InitializationFailed(_)));
    }

    #[test]
    fn test_trajectory_stores_inverse_pose() {
        let contents = "# ground truth\n1.0 1.0 2.0 3.0 0 0 0 1\n";
        let poses = parse_trajectory(contents, src()).unwrap();
        assert_eq!(poses.len(), 1);

        // The recorded pose is a pure translation, so its inverse moves back
        let origin = poses[0].trajectory.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(origin.length() < 1e-6);
    }

    #[test]
    fn test_trajectory_stops_at_zero_quaternion() {
        let contents = "1.0 0 0 0 0 0 0 1\n2.0 0 0 0 0 0 0 0\n3.0 0 0 0 0 0 0 1\n";
        let poses = parse_trajectory(contents, src()).unwrap();
        assert_eq!(poses.len(), 1);
    }

    #[test]
    fn test_trajectory_rejects_bad_number() {
        let err = parse_trajectory("1.0 0 0 zero 0 0 0 1\n", src()).unwrap_err();
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn test_nearest_pose() {
        let poses: Vec<PoseEntry> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&timestamp| PoseEntry {
                timestamp,
                trajectory: Mat4::IDENTITY,
            })
            .collect();

        assert_eq!(nearest_pose(&poses, 0.0), Some(0));
        assert_eq!(nearest_pose(&poses, 2.2), Some(1));
        assert_eq!(nearest_pose(&poses, 2.5), Some(1));
        assert_eq!(nearest_pose(&poses, 9.0), Some(2));
        assert_eq!(nearest_pose(&[], 1.0), None);
    }
}
