// SPDX-License-Identifier: MPL-2.0

//! rgbd-mesh - per-frame mesh reconstruction from RGB-D sequences
//!
//! Every depth pixel of a frame is back-projected into world space with its
//! color, the resulting point grid is triangulated two triangles per cell,
//! triangles spanning depth discontinuities are dropped, and the mesh is
//! written as a COFF file named after the frame.
//!
//! # Architecture
//!
//! - [`backends`]: Frame sources (TUM RGB-D dataset, in-memory frames)
//! - [`pipelines`]: Back-projection, triangulation, and OFF export
//! - [`config`]: User configuration handling
//! - [`errors`]: Error taxonomy of a reconstruction run
//!
//! # Example
//!
//! ```no_run
//! use rgbd_mesh::{Config, pipelines::scene::reconstruct_dataset};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let summary = reconstruct_dataset(Path::new("rgbd_dataset_freiburg1_xyz"), &config, None)?;
//! println!("wrote {} meshes", summary.frame_count());
//! # Ok::<(), rgbd_mesh::errors::ReconstructionError>(())
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;

// Re-export commonly used types
pub use backends::{CameraIntrinsics, FrameSource, MemorySource, RgbdFrame, TumDataset};
pub use config::Config;
pub use errors::{ReconstructionError, ReconstructionResult};
pub use pipelines::scene::{Mesh, PixelAxes, SceneConfig, WorldPoint};
