//! Session configuration shared by the UI, the session loop and the figure
//! renderer.

use crate::grid::GridSpacing;
use crate::session::Axis;
use crate::table::AxisCount;

pub use crate::grid::DEFAULT_GRID_SPACING;

/// RGB used for the sampling grid overlay (cyan).
pub const GRID_COLOR: [u8; 3] = [0, 255, 255];

/// RGB used for the current-node marker (magenta).
pub const MARKER_COLOR: [u8; 3] = [255, 0, 255];

/// Configuration for one point-count session.
#[derive(Debug, Clone)]
pub struct PointCountConfig {
    /// Distance in pixels between adjacent grid nodes.
    pub grid_spacing: GridSpacing,
    /// Number of grain axes measured per node.
    pub n_axes: AxisCount,
    /// RGB of the major-axis measurement lines (red).
    pub major_color: [u8; 3],
    /// RGB of the minor-axis measurement lines (blue).
    pub minor_color: [u8; 3],
    /// Window title.
    pub title: String,
}

impl Default for PointCountConfig {
    fn default() -> Self {
        Self {
            grid_spacing: GridSpacing::default(),
            n_axes: AxisCount::default(),
            major_color: [255, 0, 0],
            minor_color: [0, 0, 255],
            title: "Point Count".to_owned(),
        }
    }
}

impl PointCountConfig {
    pub fn axis_color(&self, axis: Axis) -> [u8; 3] {
        match axis {
            Axis::Major => self.major_color,
            Axis::Minor => self.minor_color,
        }
    }
}
