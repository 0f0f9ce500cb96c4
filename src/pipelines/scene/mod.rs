// SPDX-License-Identifier: GPL-3.0-only

//! Scene reconstruction pipeline
//!
//! Turns each RGB-D frame into one colored mesh file:
//! - Back-project depth pixels to world-space points with color
//! - Triangulate the point grid, dropping triangles across depth edges
//! - Write the mesh as COFF text named after the frame id

mod back_projection;
mod grid;
mod off_export;
mod triangulation;

pub use back_projection::{
    PixelAxes, PointGrid, WorldPoint, back_project, back_project_pixel, camera_to_world,
    project_to_pixel,
};
pub use grid::{GridCell, GridDims};
pub use off_export::{export_mesh_off, write_off};
pub use triangulation::{Mesh, triangulate};

use crate::backends::{FrameSource, RgbdFrame, TumDataset};
use crate::config::Config;
use crate::constants::{EDGE_THRESHOLD, mesh_output};
use crate::errors::{ReconstructionError, ReconstructionResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Scene reconstruction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Directory receiving the mesh files
    pub output_dir: PathBuf,
    /// File name prefix, followed by the frame id
    pub base_name: String,
    /// File extension without the dot
    pub extension: String,
    /// Maximum triangle edge length in world units
    pub edge_threshold: f32,
    /// Pixel axis convention for back-projection
    pub pixel_axes: PixelAxes,
    /// Stop after this many frames
    pub max_frames: Option<usize>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_name: mesh_output::DEFAULT_BASE_NAME.to_string(),
            extension: mesh_output::DEFAULT_EXTENSION.to_string(),
            edge_threshold: EDGE_THRESHOLD,
            pixel_axes: PixelAxes::default(),
            max_frames: None,
        }
    }
}

impl From<&Config> for SceneConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            base_name: config.base_name.clone(),
            extension: config.extension.clone(),
            edge_threshold: config.edge_threshold,
            pixel_axes: config.pixel_axes,
            max_frames: config.max_frames,
        }
    }
}

impl SceneConfig {
    /// Output path for a frame: `<output_dir>/<base_name><frame_id>.<extension>`
    pub fn mesh_path(&self, frame_id: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.{}", self.base_name, frame_id, self.extension))
    }
}

/// What one processed frame produced
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub frame_id: usize,
    pub mesh_path: PathBuf,
    pub vertex_count: usize,
    pub valid_point_count: usize,
    pub face_count: usize,
}

/// Result of a reconstruction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructionSummary {
    pub frames: Vec<FrameResult>,
    /// Run stopped on request before the source was exhausted
    pub interrupted: bool,
}

impl ReconstructionSummary {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn total_faces(&self) -> usize {
        self.frames.iter().map(|f| f.face_count).sum()
    }
}

/// Build the mesh of one frame without writing it
pub fn reconstruct_frame(frame: &RgbdFrame, config: &SceneConfig) -> ReconstructionResult<Mesh> {
    let points = back_project(frame, config.pixel_axes)?;
    Ok(triangulate(points, config.edge_threshold))
}

/// Reconstruct one frame and write its mesh file
pub fn process_frame(frame: &RgbdFrame, config: &SceneConfig) -> ReconstructionResult<FrameResult> {
    let mesh = reconstruct_frame(frame, config)?;
    let mesh_path = config.mesh_path(frame.frame_id);

    export_mesh_off(&mesh, &mesh_path)?;

    let result = FrameResult {
        frame_id: frame.frame_id,
        mesh_path,
        vertex_count: mesh.vertex_count(),
        valid_point_count: mesh.valid_point_count(),
        face_count: mesh.face_count(),
    };

    info!(
        frame = result.frame_id,
        path = %result.mesh_path.display(),
        vertex_count = result.vertex_count,
        valid_points = result.valid_point_count,
        face_count = result.face_count,
        "Wrote frame mesh"
    );

    Ok(result)
}

/// Process frames until the source is exhausted
///
/// Stops early after `config.max_frames` frames or once `stop` is set; the
/// flag is checked between frames so every started frame is written. The
/// first error aborts the run.
pub fn reconstruct_sequence<S: FrameSource + ?Sized>(
    source: &mut S,
    config: &SceneConfig,
    stop: Option<&AtomicBool>,
) -> ReconstructionResult<ReconstructionSummary> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| ReconstructionError::write(&config.output_dir, e))?;

    let mut summary = ReconstructionSummary::default();

    loop {
        if config
            .max_frames
            .is_some_and(|max| summary.frame_count() >= max)
        {
            debug!(frames = summary.frame_count(), "Frame limit reached");
            break;
        }
        if stop.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            info!(frames = summary.frame_count(), "Reconstruction interrupted");
            summary.interrupted = true;
            break;
        }

        let Some(frame) = source.next_frame()? else {
            break;
        };
        summary.frames.push(process_frame(&frame, config)?);
    }

    info!(
        frames = summary.frame_count(),
        faces = summary.total_faces(),
        output_dir = %config.output_dir.display(),
        "Reconstruction complete"
    );

    Ok(summary)
}

/// Open a TUM RGB-D dataset as configured
pub fn open_dataset(dataset_dir: &Path, config: &Config) -> ReconstructionResult<TumDataset> {
    let mut dataset = TumDataset::open(dataset_dir, config.frame_increment)?
        .with_depth_scale(config.depth_scale);
    if let Some(intrinsics) = config.intrinsics {
        dataset = dataset.with_intrinsics(intrinsics);
    }
    Ok(dataset)
}

/// Open a TUM RGB-D dataset and reconstruct every selected frame
///
/// Nothing is written if the dataset cannot be opened.
pub fn reconstruct_dataset(
    dataset_dir: &Path,
    config: &Config,
    stop: Option<&AtomicBool>,
) -> ReconstructionResult<ReconstructionSummary> {
    let mut dataset = open_dataset(dataset_dir, config)?;
    reconstruct_sequence(&mut dataset, &SceneConfig::from(config), stop)
}
