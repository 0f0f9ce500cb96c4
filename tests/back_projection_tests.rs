// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for depth back-projection

use glam::{Mat4, Quat, Vec3};
use rgbd_mesh::constants::MINF;
use rgbd_mesh::pipelines::scene::{GridDims, PixelAxes, back_project, project_to_pixel};
use rgbd_mesh::{CameraIntrinsics, ReconstructionError, RgbdFrame};

const WIDTH: usize = 16;
const HEIGHT: usize = 12;

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics {
        fx: 520.0,
        fy: 515.0,
        cx: 7.5,
        cy: 5.5,
    }
}

fn extrinsics() -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_rotation_y(0.1),
        Vec3::new(0.025, -0.01, 0.0),
    )
}

fn pose() -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_euler(glam::EulerRot::XYZ, 0.3, -0.2, 0.7),
        Vec3::new(1.3, 0.6, 1.6),
    )
}

/// Deterministic depth with holes every 7th pixel
fn test_frame() -> RgbdFrame {
    let dims = GridDims::new(WIDTH, HEIGHT);
    let depth = (0..dims.len())
        .map(|i| {
            if i % 7 == 3 {
                MINF
            } else {
                0.6 + ((i * 37) % 101) as f32 * 0.02
            }
        })
        .collect();
    let color = (0..dims.len())
        .map(|i| [i as u8, (i * 3) as u8, (i * 5) as u8, 42])
        .collect();

    RgbdFrame::new(5, WIDTH, HEIGHT, depth, color)
        .with_intrinsics(intrinsics())
        .with_extrinsics(extrinsics())
        .with_pose(pose())
}

#[test]
fn test_output_matches_input_layout() {
    let frame = test_frame();
    let grid = back_project(&frame, PixelAxes::Reference).unwrap();

    assert_eq!(grid.dims(), GridDims::new(WIDTH, HEIGHT));
    assert_eq!(grid.points().len(), WIDTH * HEIGHT);
    assert_eq!(grid.valid_count(), frame.valid_depth_count());
}

#[test]
fn test_invalid_pixels_ignore_camera_parameters() {
    let frame = test_frame();
    for axes in [PixelAxes::Reference, PixelAxes::Pinhole] {
        let grid = back_project(&frame, axes).unwrap();
        for (i, point) in grid.points().iter().enumerate() {
            if frame.depth[i] == MINF {
                assert!(!point.is_valid());
                assert_eq!(point.position.to_array(), [MINF; 4]);
                assert_eq!(point.color, [0, 0, 0, 0]);
            }
        }
    }
}

#[test]
fn test_valid_pixels_carry_color_and_unit_w() {
    let frame = test_frame();
    let grid = back_project(&frame, PixelAxes::Reference).unwrap();
    for (i, point) in grid.points().iter().enumerate() {
        if frame.depth[i] != MINF {
            assert!(point.is_valid());
            assert_eq!(point.color, frame.color[i]);
            assert!((point.position.w - 1.0).abs() < 1e-5);
        }
    }
}

#[test]
fn test_round_trip_recovers_pixel_and_depth() {
    let frame = test_frame();
    let dims = GridDims::new(WIDTH, HEIGHT);

    for axes in [PixelAxes::Reference, PixelAxes::Pinhole] {
        let grid = back_project(&frame, axes).unwrap();
        for (i, point) in grid.points().iter().enumerate() {
            if !point.is_valid() {
                continue;
            }
            let (row, col) = dims.row_col(i);
            let (r, c, d) =
                project_to_pixel(point.position, &intrinsics(), extrinsics(), pose(), axes);

            assert!((r - row as f32).abs() < 1e-2, "{axes:?} pixel {i}: row {r}");
            assert!((c - col as f32).abs() < 1e-2, "{axes:?} pixel {i}: col {c}");
            assert!((d - frame.depth[i]).abs() < 1e-4, "{axes:?} pixel {i}: depth {d}");
        }
    }
}

#[test]
fn test_identity_transforms_give_camera_space() {
    let frame = RgbdFrame::new(0, 2, 1, vec![2.0, 2.0], vec![[0; 4]; 2]).with_intrinsics(
        CameraIntrinsics {
            fx: 100.0,
            fy: 200.0,
            cx: 0.0,
            cy: 0.0,
        },
    );

    // Reference axes: row pairs with fx, col with fy
    let grid = back_project(&frame, PixelAxes::Reference).unwrap();
    let second = grid.points()[1].xyz();
    assert!((second - Vec3::new(0.0, 0.01, 2.0)).length() < 1e-6);

    let grid = back_project(&frame, PixelAxes::Pinhole).unwrap();
    let second = grid.points()[1].xyz();
    assert!((second - Vec3::new(0.02, 0.0, 2.0)).length() < 1e-6);
}

#[test]
fn test_mismatched_buffers_are_rejected() {
    let frame = RgbdFrame::new(0, 3, 3, vec![1.0; 9], vec![[0; 4]; 8]);
    let err = back_project(&frame, PixelAxes::Reference).unwrap_err();
    assert!(matches!(err, ReconstructionError::InvalidFrame(_)));
}

#[test]
fn test_non_finite_depth_is_rejected() {
    let mut depth = vec![1.0; 9];
    depth[4] = f32::NAN;
    let frame = RgbdFrame::new(0, 3, 3, depth, vec![[0; 4]; 9]);
    let err = back_project(&frame, PixelAxes::Reference).unwrap_err();
    assert!(matches!(err, ReconstructionError::InvalidFrame(_)));
}

#[test]
fn test_empty_frame() {
    let frame = RgbdFrame::new(0, 0, 0, Vec::new(), Vec::new());
    let grid = back_project(&frame, PixelAxes::Reference).unwrap();
    assert!(grid.points().is_empty());
}
