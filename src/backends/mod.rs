// SPDX-License-Identifier: MPL-2.0

//! Frame sources feeding the reconstruction pipeline
//!
//! A frame source yields one [`RgbdFrame`] per call: depth and color grids
//! of the same dimensions plus the camera parameters for that frame.
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │   TumDataset (disk)  │     │ MemorySource (tests) │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            └─────────────┬──────────────┘
//!                          │ FrameSource::next_frame
//!                 ┌────────┴────────┐
//!                 │  Scene pipeline │
//!                 └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`memory`]: Pre-built frames held in memory
//! - [`tum`]: TUM RGB-D dataset reader
//! - [`types`]: Frame, intrinsics, and error types shared by all sources

pub mod memory;
pub mod tum;
pub mod types;

pub use memory::MemorySource;
pub use tum::TumDataset;
pub use types::{BackendError, BackendResult, CameraIntrinsics, RgbdFrame};

/// Source of consecutive RGB-D frames
///
/// Initialization happens in the implementor's constructor; failures there
/// are reported as [`BackendError::InitializationFailed`].
pub trait FrameSource {
    /// Load the next frame
    ///
    /// Returns `Ok(None)` once the sequence is exhausted. This is the
    /// normal end of a run, not an error.
    fn next_frame(&mut self) -> BackendResult<Option<RgbdFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> BackendResult<Option<RgbdFrame>> {
        (**self).next_frame()
    }
}
