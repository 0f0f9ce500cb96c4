// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Reconstructing meshes from a dataset
//! - Inspecting a dataset

use rgbd_mesh::Config;
use rgbd_mesh::PixelAxes;
use rgbd_mesh::pipelines::scene::{open_dataset, reconstruct_dataset};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub every: Option<usize>,
    pub max_frames: Option<usize>,
    pub edge_threshold: Option<f32>,
    pub pinhole_axes: bool,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(every) = self.every {
            config.frame_increment = every;
        }
        if let Some(max_frames) = self.max_frames {
            config.max_frames = Some(max_frames);
        }
        if let Some(edge_threshold) = self.edge_threshold {
            config.edge_threshold = edge_threshold;
        }
        if self.pinhole_axes {
            config.pixel_axes = PixelAxes::Pinhole;
        }
    }
}

/// Reconstruct every selected frame of a dataset
pub fn reconstruct(
    dataset: PathBuf,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(config_path.as_deref())?;
    overrides.apply(&mut config);
    config.validate()?;

    if config.pixel_axes == PixelAxes::Reference {
        warn!(
            "Using reference pixel axes (row paired with fx); \
             pass --pinhole-axes for conventional unprojection"
        );
    }

    // Finish the frame in progress, then stop
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    println!("Dataset: {}", dataset.display());
    println!("Output: {}", config.output_dir.display());

    let summary = reconstruct_dataset(&dataset, &config, Some(&*stop_flag))?;

    println!();
    for frame in &summary.frames {
        println!(
            "  {} ({} faces, {}/{} valid points)",
            frame.mesh_path.display(),
            frame.face_count,
            frame.valid_point_count,
            frame.vertex_count
        );
    }
    println!();
    if summary.interrupted {
        println!("Stopped early.");
    }
    println!(
        "Wrote {} meshes ({} faces total)",
        summary.frame_count(),
        summary.total_faces()
    );

    Ok(())
}

/// Print dataset size, resolution, and calibration
pub fn inspect(
    dataset: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(config_path.as_deref())?;
    let dataset = open_dataset(&dataset, &config)?;

    println!("Dataset: {}", dataset.base_dir().display());
    println!("  Frames: {}", dataset.len());
    println!(
        "  Selected: {} (every {})",
        dataset.len().div_ceil(config.frame_increment),
        config.frame_increment
    );
    println!("  Poses: {}", dataset.trajectory_len());

    match dataset.resolution()? {
        Some((width, height)) => println!("  Resolution: {}x{}", width, height),
        None => println!("  Resolution: -"),
    }

    let intrinsics = dataset.intrinsics();
    println!(
        "  Intrinsics: fx={} fy={} cx={} cy={}",
        intrinsics.fx, intrinsics.fy, intrinsics.cx, intrinsics.cy
    );

    Ok(())
}
