// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for RGB-D frames
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐     ┌──────────────┐
//! │  RGB-D Frame │ ──▶ │   Scene Pipeline   │ ──▶ │  COFF File   │
//! │ depth+color  │     │  - Back-projection │     │ mesh_<id>.off│
//! │ + camera     │     │  - Triangulation   │     │              │
//! │              │     │  - OFF export      │     │              │
//! └──────────────┘     └────────────────────┘     └──────────────┘
//! ```
//!
//! Each frame is processed independently: nothing computed for one frame
//! survives into the next.
//!
//! # Modules
//!
//! - [`scene`]: Per-frame mesh reconstruction and the sequence driver

pub mod scene;
