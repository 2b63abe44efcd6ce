//! The measurement result table.
//!
//! A session pre-allocates one row per grid node and writes rows in traversal
//! order behind a high-water-mark counter. Rows past the counter stay
//! zero-filled; exports write them out as-is rather than truncating, so an
//! aborted session still produces a full-shape table.

use crate::grid::GridNode;

/// How many grain axes the operator measures at each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisCount {
    One,
    #[default]
    Two,
}

impl AxisCount {
    pub fn as_usize(self) -> usize {
        match self {
            AxisCount::One => 1,
            AxisCount::Two => 2,
        }
    }
}

/// One completed node: its grid position plus a pixel distance per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub node: GridNode,
    pub axis1: f64,
    /// `None` when the session measures a single axis.
    pub axis2: Option<f64>,
}

/// Pre-sized, zero-filled table of measurements.
///
/// Columns are `x, y, axis1[, axis2]`; storage is a flat row-major arena.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    cells: Vec<f64>,
    rows: usize,
    cols: usize,
    filled: usize,
}

impl ResultTable {
    /// Allocate `rows` zero-filled rows of `2 + n_axes` columns.
    pub fn new(rows: usize, n_axes: AxisCount) -> Self {
        let cols = 2 + n_axes.as_usize();
        Self {
            cells: vec![0.0; rows * cols],
            rows,
            cols,
            filled: 0,
        }
    }

    /// Rebuild a table from raw cells, e.g. when re-reading an export.
    ///
    /// Returns `None` if `cells` is not `rows * cols` long or `cols` does not
    /// match a 1- or 2-axis layout.
    pub fn from_cells(cells: Vec<f64>, rows: usize, cols: usize) -> Option<Self> {
        if cells.len() != rows * cols || !(3..=4).contains(&cols) {
            return None;
        }
        Some(Self {
            cells,
            rows,
            cols,
            filled: rows,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows actually written so far.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn n_axes(&self) -> AxisCount {
        if self.cols == 3 {
            AxisCount::One
        } else {
            AxisCount::Two
        }
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.cells[index * self.cols..(index + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Record one completed node at the next free row.
    ///
    /// Returns `false` (and records nothing) once the table is full, or when
    /// the measurement's axis count does not match the column layout.
    pub fn record(&mut self, m: Measurement) -> bool {
        if self.filled >= self.rows || (m.axis2.is_some() != (self.cols == 4)) {
            return false;
        }
        let base = self.filled * self.cols;
        self.cells[base] = m.node.x as f64;
        self.cells[base + 1] = m.node.y as f64;
        self.cells[base + 2] = m.axis1;
        if let Some(ax2) = m.axis2 {
            self.cells[base + 3] = ax2;
        }
        self.filled += 1;
        true
    }
}
