// SPDX-License-Identifier: GPL-3.0-only

//! Depth back-projection into world space
//!
//! Every depth pixel becomes one [`WorldPoint`], in the same row-major
//! order as the input. Pixels without a depth measurement keep their slot
//! as an invalid point so grid adjacency survives into triangulation.

use super::grid::GridDims;
use crate::backends::{CameraIntrinsics, RgbdFrame};
use crate::constants::MINF;
use crate::errors::{ReconstructionError, ReconstructionResult};
use glam::{Mat4, Vec3, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which pixel axis pairs with which focal length during unprojection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelAxes {
    /// `x = (row - cx) * d / fx`, `y = (col - cy) * d / fy`
    ///
    /// Kept for compatibility with previously exported meshes. On a dataset
    /// with conventional calibration the result is mirrored across the
    /// image diagonal.
    #[default]
    Reference,
    /// `x = (col - cx) * d / fx`, `y = (row - cy) * d / fy`
    Pinhole,
}

impl PixelAxes {
    /// Camera-space (x, y) of a pixel at the given depth
    pub fn unproject(
        self,
        row: f32,
        col: f32,
        depth: f32,
        intrinsics: &CameraIntrinsics,
    ) -> (f32, f32) {
        let (u, v) = match self {
            PixelAxes::Reference => (row, col),
            PixelAxes::Pinhole => (col, row),
        };
        (
            (u - intrinsics.cx) * depth / intrinsics.fx,
            (v - intrinsics.cy) * depth / intrinsics.fy,
        )
    }

    /// Pixel (row, col) of a camera-space point; inverse of [`Self::unproject`]
    pub fn project(self, x: f32, y: f32, depth: f32, intrinsics: &CameraIntrinsics) -> (f32, f32) {
        let u = x * intrinsics.fx / depth + intrinsics.cx;
        let v = y * intrinsics.fy / depth + intrinsics.cy;
        match self {
            PixelAxes::Reference => (u, v),
            PixelAxes::Pinhole => (v, u),
        }
    }
}

/// One back-projected pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    /// Homogeneous world position, `w = 1` when valid
    pub position: Vec4,
    pub color: [u8; 4],
}

impl WorldPoint {
    /// Placeholder for a pixel without depth
    pub const INVALID: WorldPoint = WorldPoint {
        position: Vec4::splat(MINF),
        color: [0; 4],
    };

    pub fn new(position: Vec3, color: [u8; 4]) -> Self {
        Self {
            position: position.extend(1.0),
            color,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.position.x != MINF
    }

    pub fn xyz(&self) -> Vec3 {
        self.position.truncate()
    }

    /// Euclidean distance between positions, ignoring `w`
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.xyz().distance(other.xyz())
    }
}

/// Frame-sized grid of world points, row-major
#[derive(Debug, Clone)]
pub struct PointGrid {
    dims: GridDims,
    points: Vec<WorldPoint>,
}

impl PointGrid {
    /// Wrap a point buffer; fails if its length is not `width * height`
    pub fn new(dims: GridDims, points: Vec<WorldPoint>) -> ReconstructionResult<Self> {
        if points.len() != dims.len() {
            return Err(ReconstructionError::InvalidFrame(format!(
                "point grid has {} points, expected {}x{}={}",
                points.len(),
                dims.width,
                dims.height,
                dims.len()
            )));
        }
        Ok(Self { dims, points })
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_valid()).count()
    }

    pub fn into_parts(self) -> (GridDims, Vec<WorldPoint>) {
        (self.dims, self.points)
    }
}

/// Camera space to world space: extrinsics inverse first, then pose inverse
pub fn camera_to_world(extrinsics: Mat4, pose: Mat4) -> Mat4 {
    pose.inverse() * extrinsics.inverse()
}

/// Back-project a single pixel
///
/// `transform` is the result of [`camera_to_world`].
pub fn back_project_pixel(
    row: usize,
    col: usize,
    depth: f32,
    color: [u8; 4],
    intrinsics: &CameraIntrinsics,
    transform: &Mat4,
    axes: PixelAxes,
) -> WorldPoint {
    if depth == MINF {
        return WorldPoint::INVALID;
    }

    let (x, y) = axes.unproject(row as f32, col as f32, depth, intrinsics);
    WorldPoint {
        position: *transform * Vec4::new(x, y, depth, 1.0),
        color,
    }
}

/// Back-project a whole frame into a world-space point grid
///
/// Rows are processed in parallel; the output order is the input order.
pub fn back_project(frame: &RgbdFrame, axes: PixelAxes) -> ReconstructionResult<PointGrid> {
    frame.validate().map_err(ReconstructionError::InvalidFrame)?;

    let dims = GridDims::new(frame.width, frame.height);
    let transform = camera_to_world(frame.extrinsics, frame.pose);
    let mut points = vec![WorldPoint::INVALID; dims.len()];

    if !dims.is_empty() {
        points
            .par_chunks_mut(dims.width)
            .enumerate()
            .for_each(|(row, out_row)| {
                let start = dims.index(row, 0);
                let depth_row = &frame.depth[start..start + dims.width];
                let color_row = &frame.color[start..start + dims.width];

                for (col, out) in out_row.iter_mut().enumerate() {
                    *out = back_project_pixel(
                        row,
                        col,
                        depth_row[col],
                        color_row[col],
                        &frame.intrinsics,
                        &transform,
                        axes,
                    );
                }
            });
    }

    PointGrid::new(dims, points)
}

/// Project a world position back to (row, col, depth) of the frame it came from
pub fn project_to_pixel(
    position: Vec4,
    intrinsics: &CameraIntrinsics,
    extrinsics: Mat4,
    pose: Mat4,
    axes: PixelAxes,
) -> (f32, f32, f32) {
    let camera = extrinsics * pose * position;
    let (row, col) = axes.project(camera.x, camera.y, camera.z, intrinsics);
    (row, col, camera.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 500.0,
            fy: 400.0,
            cx: 2.0,
            cy: 1.0,
        }
    }

    #[test]
    fn test_reference_axes_pair_row_with_fx() {
        let (x, y) = PixelAxes::Reference.unproject(7.0, 3.0, 2.0, &intrinsics());
        assert!((x - (7.0 - 2.0) * 2.0 / 500.0).abs() < 1e-7);
        assert!((y - (3.0 - 1.0) * 2.0 / 400.0).abs() < 1e-7);
    }

    #[test]
    fn test_pinhole_axes_pair_col_with_fx() {
        let (x, y) = PixelAxes::Pinhole.unproject(7.0, 3.0, 2.0, &intrinsics());
        assert!((x - (3.0 - 2.0) * 2.0 / 500.0).abs() < 1e-7);
        assert!((y - (7.0 - 1.0) * 2.0 / 400.0).abs() < 1e-7);
    }

    #[test]
    fn test_project_inverts_unproject() {
        for axes in [PixelAxes::Reference, PixelAxes::Pinhole] {
            let (x, y) = axes.unproject(11.0, 5.0, 1.5, &intrinsics());
            let (row, col) = axes.project(x, y, 1.5, &intrinsics());
            assert!((row - 11.0).abs() < 1e-4, "{axes:?}");
            assert!((col - 5.0).abs() < 1e-4, "{axes:?}");
        }
    }

    #[test]
    fn test_sentinel_pixel_is_invalid() {
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let point = back_project_pixel(
            0,
            0,
            MINF,
            [9, 9, 9, 9],
            &intrinsics(),
            &transform,
            PixelAxes::Reference,
        );
        assert_eq!(point.color, [0, 0, 0, 0]);
        assert!(point.position.to_array().iter().all(|&c| c == MINF));
        assert!(!point.is_valid());
    }

    #[test]
    fn test_extrinsics_inverse_applied_before_pose_inverse() {
        let extrinsics = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let pose = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let transform = camera_to_world(extrinsics, pose);

        // extrinsics^-1 rotates (1,0,0) to (0,-1,0), then pose^-1 shifts x by -1
        let world = transform * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((world - Vec4::new(-1.0, -1.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_point_grid_rejects_wrong_length() {
        let err = PointGrid::new(GridDims::new(2, 2), vec![WorldPoint::INVALID; 3]).unwrap_err();
        assert!(matches!(err, ReconstructionError::InvalidFrame(_)));
    }

    #[test]
    fn test_world_point_distance_ignores_w() {
        let a = WorldPoint::new(Vec3::ZERO, [0; 4]);
        let mut b = WorldPoint::new(Vec3::new(3.0, 4.0, 0.0), [0; 4]);
        b.position.w = 100.0;
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
