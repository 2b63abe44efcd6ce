//! The interactive measurement session.
//!
//! [`run_session`] walks the operator over every grid node in traversal
//! order, collecting one line pick (two clicks) per configured axis and
//! accumulating distances into a [`ResultTable`]. All presentation and click
//! capture goes through the [`SessionSurface`] trait, so the loop itself
//! never touches a GUI type; the native window implements the trait over
//! channels (see [`crate::surface`]) and tests implement it with scripted
//! picks.

use thiserror::Error;

use crate::config::PointCountConfig;
use crate::figure::{self, FigureRequest};
use crate::geometry::distance;
use crate::grid::{self, GridNode, GridSpacing};
use crate::table::{AxisCount, Measurement, ResultTable};

/// Which grain axis a line pick belongs to. Axes are drawn in different
/// colors so the operator can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Major,
    Minor,
}

/// Two endpoints from one interactive capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePick {
    pub a: [f64; 2],
    pub b: [f64; 2],
}

impl LinePick {
    pub fn length(&self) -> f64 {
        distance(self.a, self.b)
    }
}

/// A completed line pick, retained to drive the live overlay and the figure
/// export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredLine {
    pub pick: LinePick,
    pub axis: Axis,
}

/// Why an interactive capture stopped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// The capture registered a different number of points than requested,
    /// typically because the operator clicked faster than the surface could
    /// keep up.
    #[error("expected exactly {expected} points, got {got} (clicked too quickly?)")]
    WrongPointCount { expected: usize, got: usize },
    /// The display window was closed or the backend went away.
    #[error("display surface closed")]
    SurfaceClosed,
}

/// Presentation and capture capability the session drives.
///
/// `capture_points` blocks until the operator has supplied `count` points or
/// the capture fails; there is no timeout, operators work at their own pace.
pub trait SessionSurface {
    /// Restrict the visible window to one grid row, bracketed by one spacing
    /// above and below, so the operator never has to scroll.
    fn zoom_to_row(&mut self, row_y: u32, spacing: GridSpacing);

    /// Highlight the node about to be measured and show how many nodes are
    /// left (including this one).
    fn focus_node(&mut self, node: GridNode, remaining: usize);

    /// Block until `count` points have been clicked for the given axis.
    fn capture_points(&mut self, count: usize, axis: Axis) -> Result<Vec<[f64; 2]>, CaptureError>;

    /// Show a completed measurement line.
    fn draw_line(&mut self, line: MeasuredLine);

    /// Zoom back out to the full image.
    fn restore_full_view(&mut self);

    /// The session is over; the surface may tear itself down.
    fn finish(&mut self) {}
}

/// Everything a finished (or aborted) session hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// Full-shape table; rows past [`ResultTable::filled`] are zero.
    pub table: ResultTable,
    /// Every line drawn before the session ended, in draw order.
    pub lines: Vec<MeasuredLine>,
    /// The node a failed capture aborted at, `None` on normal completion.
    pub failed_at: Option<GridNode>,
}

impl SessionOutcome {
    pub fn completed(&self) -> bool {
        self.failed_at.is_none()
    }
}

/// Capture one line pick for `axis`, validating the point count.
fn capture_line<S: SessionSurface>(surface: &mut S, axis: Axis) -> Result<LinePick, CaptureError> {
    let points = surface.capture_points(2, axis)?;
    match points.as_slice() {
        [a, b] => Ok(LinePick { a: *a, b: *b }),
        other => Err(CaptureError::WrongPointCount {
            expected: 2,
            got: other.len(),
        }),
    }
}

/// Drive the operator over every grid node of a `width` x `height` image.
///
/// Aborts on the first failed capture and returns the table as accumulated so
/// far; there is no per-node retry. On normal completion the full-image view
/// is restored and, when `figure` is given, a rendering of the session is
/// written to disk.
pub fn run_session<S: SessionSurface>(
    surface: &mut S,
    width: u32,
    height: u32,
    config: &PointCountConfig,
    figure: Option<FigureRequest<'_>>,
) -> SessionOutcome {
    let spacing = config.grid_spacing;
    let n_nodes = grid::node_count(width, height, spacing);
    let mut table = ResultTable::new(n_nodes, config.n_axes);
    let mut lines = Vec::new();
    let mut current_row = None;

    for (ctr, node) in grid::nodes(width, height, spacing).enumerate() {
        if current_row != Some(node.y) {
            surface.zoom_to_row(node.y, spacing);
            current_row = Some(node.y);
        }
        surface.focus_node(node, n_nodes - ctr);

        let mut measure = |axis| -> Result<f64, CaptureError> {
            let pick = capture_line(surface, axis)?;
            let line = MeasuredLine { pick, axis };
            surface.draw_line(line);
            lines.push(line);
            Ok(pick.length())
        };

        let measured = measure(Axis::Major).and_then(|axis1| {
            let axis2 = match config.n_axes {
                AxisCount::One => None,
                AxisCount::Two => Some(measure(Axis::Minor)?),
            };
            Ok(Measurement { node, axis1, axis2 })
        });

        match measured {
            Ok(m) => {
                table.record(m);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Failed at node x = {}, y = {}", node.x, node.y);
                surface.finish();
                return SessionOutcome {
                    table,
                    lines,
                    failed_at: Some(node),
                };
            }
        }
    }

    surface.restore_full_view();
    if let Some(request) = figure {
        match figure::save_figure(&request, &lines, config) {
            Ok(()) => println!("Figure saved as {}", request.path.display()),
            Err(err) => eprintln!("Could not save figure: {err}"),
        }
    }
    surface.finish();
    SessionOutcome {
        table,
        lines,
        failed_at: None,
    }
}
