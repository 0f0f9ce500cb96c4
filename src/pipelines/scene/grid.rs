// SPDX-License-Identifier: GPL-3.0-only

//! Row-major pixel grid indexing
//!
//! Depth, color, and world points all share one flat row-major layout.
//! [`GridDims::cells`] enumerates the 2x2 neighborhoods used for
//! triangulation without any modulo arithmetic at the borders.

/// Dimensions of a row-major pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear index of (row, col)
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// (row, col) of a linear index
    pub const fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Number of 2x2 cells
    pub const fn cell_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }

    /// All 2x2 cells in increasing order of their top-left index
    ///
    /// The last row and the last column never anchor a cell.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let dims = *self;
        (0..dims.height.saturating_sub(1)).flat_map(move |row| {
            (0..dims.width.saturating_sub(1)).map(move |col| GridCell::at(dims, row, col))
        })
    }
}

/// Linear indices of the four corners of a 2x2 cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub top_left: usize,
    pub top_right: usize,
    pub bottom_left: usize,
    pub bottom_right: usize,
}

impl GridCell {
    /// Cell anchored at (row, col); the caller keeps row and col off the last row/column
    pub const fn at(dims: GridDims, row: usize, col: usize) -> Self {
        let top_left = dims.index(row, col);
        Self {
            top_left,
            top_right: top_left + 1,
            bottom_left: top_left + dims.width,
            bottom_right: top_left + dims.width + 1,
        }
    }

    /// (top-left, bottom-left, top-right)
    pub const fn left_triangle(&self) -> [usize; 3] {
        [self.top_left, self.bottom_left, self.top_right]
    }

    /// (bottom-left, bottom-right, top-right)
    pub const fn right_triangle(&self) -> [usize; 3] {
        [self.bottom_left, self.bottom_right, self.top_right]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let dims = GridDims::new(640, 480);
        assert_eq!(dims.index(2, 5), 1285);
        assert_eq!(dims.row_col(1285), (2, 5));
        assert_eq!(dims.len(), 307_200);
    }

    #[test]
    fn test_cells_skip_last_row_and_column() {
        let dims = GridDims::new(3, 3);
        let anchors: Vec<usize> = dims.cells().map(|c| c.top_left).collect();
        assert_eq!(anchors, vec![0, 1, 3, 4]);
        assert_eq!(dims.cell_count(), 4);
    }

    #[test]
    fn test_cells_match_linear_scan() {
        let dims = GridDims::new(5, 4);
        let expected: Vec<usize> = (0..dims.len())
            .filter(|i| *i < dims.width * (dims.height - 1))
            .filter(|i| i % dims.width != dims.width - 1)
            .collect();
        let anchors: Vec<usize> = dims.cells().map(|c| c.top_left).collect();
        assert_eq!(anchors, expected);
    }

    #[test]
    fn test_degenerate_grids_have_no_cells() {
        assert_eq!(GridDims::new(1, 10).cells().count(), 0);
        assert_eq!(GridDims::new(10, 1).cells().count(), 0);
        assert_eq!(GridDims::new(0, 0).cells().count(), 0);
    }

    #[test]
    fn test_cell_corners_and_triangles() {
        let cell = GridCell::at(GridDims::new(4, 3), 1, 2);
        assert_eq!(cell.top_left, 6);
        assert_eq!(cell.top_right, 7);
        assert_eq!(cell.bottom_left, 10);
        assert_eq!(cell.bottom_right, 11);
        assert_eq!(cell.left_triangle(), [6, 10, 7]);
        assert_eq!(cell.right_triangle(), [10, 11, 7]);
    }
}
