// SPDX-License-Identifier: GPL-3.0-only

//! Grid triangulation with discontinuity rejection
//!
//! Each 2x2 cell contributes up to two triangles sharing the
//! top-right/bottom-left diagonal:
//!
//! ```text
//!   TL ─── TR
//!   │    ╱ │      left  = (TL, BL, TR)
//!   │  ╱   │      right = (BL, BR, TR)
//!   BL ─── BR
//! ```
//!
//! A triangle is kept only when all three corners are valid and each of its
//! three edges is strictly shorter than the edge threshold.

use super::back_projection::{PointGrid, WorldPoint};
use tracing::debug;

/// Point grid plus the admissible triangles over it
#[derive(Debug, Clone)]
pub struct Mesh {
    points: Vec<WorldPoint>,
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// All grid points, invalid ones included
    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    /// Triangles in cell-scan order, left before right within a cell
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Always `width * height`
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn valid_point_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_valid()).count()
    }
}

/// True if every edge of the triangle is strictly shorter than `threshold`
fn edges_below(a: &WorldPoint, b: &WorldPoint, c: &WorldPoint, threshold: f32) -> bool {
    a.distance(b) < threshold && a.distance(c) < threshold && b.distance(c) < threshold
}

/// Collect the admissible triangles of a point grid
///
/// Triangles are gathered in one pass so the face list and the face count
/// always agree.
pub fn triangulate(grid: PointGrid, edge_threshold: f32) -> Mesh {
    let (dims, points) = grid.into_parts();
    let mut triangles = Vec::new();

    for cell in dims.cells() {
        let top_right = &points[cell.top_right];
        let bottom_left = &points[cell.bottom_left];

        // Shared by both triangles
        if !top_right.is_valid() || !bottom_left.is_valid() {
            continue;
        }

        let top_left = &points[cell.top_left];
        if top_left.is_valid() && edges_below(top_left, top_right, bottom_left, edge_threshold) {
            triangles.push(cell.left_triangle());
        }

        let bottom_right = &points[cell.bottom_right];
        if bottom_right.is_valid()
            && edges_below(bottom_right, top_right, bottom_left, edge_threshold)
        {
            triangles.push(cell.right_triangle());
        }
    }

    debug!(
        width = dims.width,
        height = dims.height,
        faces = triangles.len(),
        "Triangulated point grid"
    );

    Mesh {
        points,
        triangles,
    }
}
