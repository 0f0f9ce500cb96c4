// SPDX-License-Identifier: GPL-3.0-only

//! TUM RGB-D dataset reader
//!
//! Streams frames from a dataset directory in the layout published by the
//! TUM computer vision group:
//!
//! ```text
//! rgbd_dataset_freiburg1_xyz/
//! ├── depth.txt          timestamp + depth/<ts>.png per line
//! ├── rgb.txt            timestamp + rgb/<ts>.png per line
//! ├── groundtruth.txt    timestamp tx ty tz qx qy qz qw per line
//! ├── depth/             16-bit PNG, 5000 units per meter, 0 = no data
//! └── rgb/               8-bit color PNG
//! ```
//!
//! Depth and color lists are paired by position. Each frame's pose is the
//! ground-truth entry nearest in time to the depth image.

mod index;

pub use index::{ImageEntry, PoseEntry, nearest_pose, parse_image_list, parse_trajectory};

use super::FrameSource;
use super::types::{
    BackendError, BackendResult, CameraIntrinsics, RgbdFrame, color_from_rgba_bytes,
};
use crate::constants::{MINF, tum};
use glam::Mat4;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Frame source over a TUM RGB-D dataset directory
#[derive(Debug)]
pub struct TumDataset {
    base_dir: PathBuf,
    depth_images: Vec<ImageEntry>,
    color_images: Vec<ImageEntry>,
    trajectory: Vec<PoseEntry>,
    intrinsics: CameraIntrinsics,
    extrinsics: Mat4,
    depth_scale: f32,
    frame_increment: usize,
    current: Option<usize>,
}

impl TumDataset {
    /// Open a dataset directory and read its index files
    ///
    /// Every `frame_increment`-th frame is visited, starting at frame 0.
    pub fn open(base_dir: impl AsRef<Path>, frame_increment: usize) -> BackendResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if frame_increment == 0 {
            return Err(BackendError::InitializationFailed(
                "frame increment must be at least 1".into(),
            ));
        }
        if !base_dir.is_dir() {
            return Err(BackendError::InitializationFailed(format!(
                "dataset directory {} does not exist",
                base_dir.display()
            )));
        }

        let depth_images = parse_image_list(
            &read_index(&base_dir, tum::DEPTH_LIST)?,
            &base_dir.join(tum::DEPTH_LIST),
        )?;
        let color_images = parse_image_list(
            &read_index(&base_dir, tum::COLOR_LIST)?,
            &base_dir.join(tum::COLOR_LIST),
        )?;
        let trajectory = parse_trajectory(
            &read_index(&base_dir, tum::GROUNDTRUTH)?,
            &base_dir.join(tum::GROUNDTRUTH),
        )?;

        if depth_images.len() != color_images.len() {
            return Err(BackendError::InitializationFailed(format!(
                "{} depth images but {} color images",
                depth_images.len(),
                color_images.len()
            )));
        }
        if trajectory.is_empty() {
            return Err(BackendError::InitializationFailed(format!(
                "{} contains no poses",
                tum::GROUNDTRUTH
            )));
        }

        info!(
            path = %base_dir.display(),
            frames = depth_images.len(),
            poses = trajectory.len(),
            frame_increment,
            "Opened TUM RGB-D dataset"
        );

        Ok(Self {
            base_dir,
            depth_images,
            color_images,
            trajectory,
            intrinsics: CameraIntrinsics::default(),
            extrinsics: Mat4::IDENTITY,
            depth_scale: tum::DEPTH_SCALE,
            frame_increment,
            current: None,
        })
    }

    /// Replace the default calibration
    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    /// Raw depth units per meter
    pub fn with_depth_scale(mut self, depth_scale: f32) -> Self {
        self.depth_scale = depth_scale;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of frames listed in the dataset (before the increment applies)
    pub fn len(&self) -> usize {
        self.color_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.color_images.is_empty()
    }

    pub fn trajectory_len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        self.intrinsics
    }

    /// Dimensions of the first depth image, if there is one
    pub fn resolution(&self) -> BackendResult<Option<(u32, u32)>> {
        let Some(first) = self.depth_images.first() else {
            return Ok(None);
        };
        let path = self.base_dir.join(&first.file);
        let (width, height) = image::image_dimensions(&path)
            .map_err(|e| BackendError::FrameRead(format!("{}: {}", path.display(), e)))?;
        Ok(Some((width, height)))
    }

    fn load_depth(&self, entry: &ImageEntry) -> BackendResult<(usize, usize, Vec<f32>)> {
        let path = self.base_dir.join(&entry.file);
        let image = image::open(&path)
            .map_err(|e| BackendError::FrameRead(format!("{}: {}", path.display(), e)))?
            .into_luma16();

        let (width, height) = image.dimensions();
        let depth = image
            .into_raw()
            .into_iter()
            .map(|raw| {
                if raw == 0 {
                    MINF
                } else {
                    raw as f32 / self.depth_scale
                }
            })
            .collect();

        Ok((width as usize, height as usize, depth))
    }

    fn load_color(&self, entry: &ImageEntry) -> BackendResult<(usize, usize, Vec<[u8; 4]>)> {
        let path = self.base_dir.join(&entry.file);
        let image = image::open(&path)
            .map_err(|e| BackendError::FrameRead(format!("{}: {}", path.display(), e)))?
            .into_rgba8();

        let (width, height) = image.dimensions();
        let color = color_from_rgba_bytes(image.as_raw()).ok_or_else(|| {
            BackendError::FrameRead(format!("{}: truncated RGBA buffer", path.display()))
        })?;

        Ok((width as usize, height as usize, color))
    }
}

impl FrameSource for TumDataset {
    fn next_frame(&mut self) -> BackendResult<Option<RgbdFrame>> {
        let idx = match self.current {
            None => 0,
            Some(idx) => idx + self.frame_increment,
        };
        if idx >= self.color_images.len() {
            debug!(idx, total = self.color_images.len(), "Dataset exhausted");
            return Ok(None);
        }
        self.current = Some(idx);

        debug!(idx, total = self.color_images.len(), "Loading frame");

        let depth_entry = &self.depth_images[idx];
        let (width, height, depth) = self.load_depth(depth_entry)?;
        let (color_width, color_height, color) = self.load_color(&self.color_images[idx])?;

        if (color_width, color_height) != (width, height) {
            return Err(BackendError::FrameRead(format!(
                "frame {}: color is {}x{} but depth is {}x{}",
                idx, color_width, color_height, width, height
            )));
        }

        // Non-empty, checked in open()
        let pose_idx = nearest_pose(&self.trajectory, depth_entry.timestamp).unwrap_or(0);
        let pose = self.trajectory[pose_idx].trajectory;

        Ok(Some(
            RgbdFrame::new(idx, width, height, depth, color)
                .with_intrinsics(self.intrinsics)
                .with_extrinsics(self.extrinsics)
                .with_pose(pose),
        ))
    }
}

fn read_index(base_dir: &Path, name: &str) -> BackendResult<String> {
    let path = base_dir.join(name);
    std::fs::read_to_string(&path).map_err(|e| {
        BackendError::InitializationFailed(format!("failed to read {}: {}", path.display(), e))
    })
}
