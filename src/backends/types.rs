// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for frame sources

use crate::constants::{MINF, tum};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Pinhole camera intrinsics for depth-to-3D unprojection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        // TUM RGB-D defaults for 640x480
        Self {
            fx: tum::FX,
            fy: tum::FY,
            cx: tum::CX,
            cy: tum::CY,
        }
    }
}

/// One RGB-D frame as delivered by a [`FrameSource`]
///
/// Depth and color are row-major grids of `width * height` samples sharing
/// the same pixel indexing.
///
/// [`FrameSource`]: super::FrameSource
#[derive(Debug, Clone)]
pub struct RgbdFrame {
    /// Monotonically increasing id, used to name the output artifact
    pub frame_id: usize,
    pub width: usize,
    pub height: usize,
    /// Depth in meters, [`MINF`] where the sensor has no measurement
    ///
    /// Sources must report missing or non-finite samples as [`MINF`].
    pub depth: Vec<f32>,
    /// RGBX color, fourth channel carried through unchanged
    pub color: Vec<[u8; 4]>,
    pub intrinsics: CameraIntrinsics,
    /// Camera to depth sensor transform
    pub extrinsics: Mat4,
    /// Sensor pose at this frame ("trajectory")
    pub pose: Mat4,
}

impl RgbdFrame {
    /// Frame with identity extrinsics and pose and default intrinsics
    pub fn new(
        frame_id: usize,
        width: usize,
        height: usize,
        depth: Vec<f32>,
        color: Vec<[u8; 4]>,
    ) -> Self {
        Self {
            frame_id,
            width,
            height,
            depth,
            color,
            intrinsics: CameraIntrinsics::default(),
            extrinsics: Mat4::IDENTITY,
            pose: Mat4::IDENTITY,
        }
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    pub fn with_extrinsics(mut self, extrinsics: Mat4) -> Self {
        self.extrinsics = extrinsics;
        self
    }

    pub fn with_pose(mut self, pose: Mat4) -> Self {
        self.pose = pose;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of pixels carrying a depth measurement
    pub fn valid_depth_count(&self) -> usize {
        self.depth.iter().filter(|&&d| d != MINF).count()
    }

    /// Check buffer lengths against the declared dimensions and reject
    /// non-finite depths other than [`MINF`]
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.pixel_count();
        if self.depth.len() != expected {
            return Err(format!(
                "frame {}: depth has {} samples, expected {}x{}={}",
                self.frame_id,
                self.depth.len(),
                self.width,
                self.height,
                expected
            ));
        }
        if self.color.len() != expected {
            return Err(format!(
                "frame {}: color has {} samples, expected {}x{}={}",
                self.frame_id,
                self.color.len(),
                self.width,
                self.height,
                expected
            ));
        }
        if let Some(idx) = self
            .depth
            .iter()
            .position(|&d| d != MINF && !d.is_finite())
        {
            return Err(format!(
                "frame {}: depth sample {} is {}, expected meters or MINF",
                self.frame_id, idx, self.depth[idx]
            ));
        }
        Ok(())
    }
}

/// Reinterpret packed RGBA bytes as per-pixel color samples
///
/// Returns `None` if the byte count is not a multiple of four.
pub fn color_from_rgba_bytes(bytes: &[u8]) -> Option<Vec<[u8; 4]>> {
    bytemuck::try_cast_slice::<u8, [u8; 4]>(bytes)
        .ok()
        .map(|pixels| pixels.to_vec())
}

/// Result type alias for frame source operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for frame source operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Source could not be opened (missing path, malformed index files)
    InitializationFailed(String),
    /// A frame's images could not be loaded or decoded
    FrameRead(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::FrameRead(msg) => write!(f, "Failed to read frame: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
