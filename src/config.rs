// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default. Command-line flags are applied on top by the CLI.

use crate::backends::CameraIntrinsics;
use crate::constants::{EDGE_THRESHOLD, config_file, mesh_output, tum};
use crate::errors::{ReconstructionError, ReconstructionResult};
use crate::pipelines::scene::PixelAxes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving the mesh files
    pub output_dir: PathBuf,
    /// Mesh file name prefix (frame id is appended)
    pub base_name: String,
    /// Mesh file extension
    pub extension: String,
    /// Maximum triangle edge length in meters
    pub edge_threshold: f32,
    /// Process every n-th frame of the dataset
    pub frame_increment: usize,
    /// Stop after this many frames
    pub max_frames: Option<usize>,
    /// Pixel axis convention for back-projection
    pub pixel_axes: PixelAxes,
    /// Raw depth units per meter in the dataset's depth images
    pub depth_scale: f32,
    /// Override the dataset's default calibration
    pub intrinsics: Option<CameraIntrinsics>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_name: mesh_output::DEFAULT_BASE_NAME.to_string(),
            extension: mesh_output::DEFAULT_EXTENSION.to_string(),
            edge_threshold: EDGE_THRESHOLD,
            frame_increment: tum::DEFAULT_FRAME_INCREMENT,
            max_frames: None,
            pixel_axes: PixelAxes::default(),
            depth_scale: tum::DEPTH_SCALE,
            intrinsics: None,
        }
    }
}

impl Config {
    /// `<config dir>/rgbd-mesh/config.json` for the current platform
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(config_file::APP_DIR).join(config_file::FILE_NAME))
    }

    /// Parse a config from JSON text
    pub fn from_json(json: &str) -> ReconstructionResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file
    pub fn load(path: &Path) -> ReconstructionResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReconstructionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_json(&json)
    }

    /// Explicit path if given, else the platform config file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> ReconstructionResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_json(&self) -> ReconstructionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> ReconstructionResult<()> {
        if !(self.edge_threshold.is_finite() && self.edge_threshold > 0.0) {
            return Err(ReconstructionError::Config(format!(
                "edge_threshold must be a positive number, got {}",
                self.edge_threshold
            )));
        }
        if self.frame_increment == 0 {
            return Err(ReconstructionError::Config(
                "frame_increment must be at least 1".into(),
            ));
        }
        if !(self.depth_scale.is_finite() && self.depth_scale > 0.0) {
            return Err(ReconstructionError::Config(format!(
                "depth_scale must be a positive number, got {}",
                self.depth_scale
            )));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ReconstructionError::Config(format!(
                "extension must be non-empty and without a leading dot, got '{}'",
                self.extension
            )));
        }
        if let Some(intrinsics) = &self.intrinsics
            && (intrinsics.fx == 0.0 || intrinsics.fy == 0.0)
        {
            return Err(ReconstructionError::Config(
                "intrinsics focal lengths must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
