use std::collections::VecDeque;

use pointcount::config::PointCountConfig;
use pointcount::grid::{GridNode, GridSpacing};
use pointcount::session::{run_session, Axis, CaptureError, MeasuredLine, SessionSurface};
use pointcount::table::AxisCount;

/// Scripted stand-in for the native window: returns canned captures and
/// records every presentation effect the session orders.
#[derive(Default)]
struct ScriptedSurface {
    picks: VecDeque<Result<Vec<[f64; 2]>, CaptureError>>,
    zoomed_rows: Vec<u32>,
    focused: Vec<(GridNode, usize)>,
    drawn: Vec<MeasuredLine>,
    restored: bool,
    finished: bool,
}

impl ScriptedSurface {
    fn with_picks(picks: Vec<Result<Vec<[f64; 2]>, CaptureError>>) -> Self {
        Self {
            picks: picks.into(),
            ..Default::default()
        }
    }
}

impl SessionSurface for ScriptedSurface {
    fn zoom_to_row(&mut self, row_y: u32, _spacing: GridSpacing) {
        self.zoomed_rows.push(row_y);
    }

    fn focus_node(&mut self, node: GridNode, remaining: usize) {
        self.focused.push((node, remaining));
    }

    fn capture_points(&mut self, _count: usize, _axis: Axis) -> Result<Vec<[f64; 2]>, CaptureError> {
        self.picks
            .pop_front()
            .unwrap_or(Err(CaptureError::SurfaceClosed))
    }

    fn draw_line(&mut self, line: MeasuredLine) {
        self.drawn.push(line);
    }

    fn restore_full_view(&mut self) {
        self.restored = true;
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn config(n_axes: AxisCount) -> PointCountConfig {
    PointCountConfig {
        grid_spacing: GridSpacing::new(100).unwrap(),
        n_axes,
        ..Default::default()
    }
}

/// A pick whose endpoints are 5 pixels apart.
fn pick_of_five() -> Result<Vec<[f64; 2]>, CaptureError> {
    Ok(vec![[0.0, 0.0], [3.0, 4.0]])
}

#[test]
fn completes_all_nodes_in_order() {
    // 350x250 at spacing 100: two rows of three nodes, two axes each.
    let mut surface = ScriptedSurface::with_picks((0..12).map(|_| pick_of_five()).collect());
    let outcome = run_session(&mut surface, 350, 250, &config(AxisCount::Two), None);

    assert!(outcome.completed());
    assert_eq!(outcome.table.rows(), 6);
    assert_eq!(outcome.table.cols(), 4);
    assert_eq!(outcome.table.filled(), 6);
    let expected = [
        (100.0, 100.0),
        (200.0, 100.0),
        (300.0, 100.0),
        (100.0, 200.0),
        (200.0, 200.0),
        (300.0, 200.0),
    ];
    for (i, (x, y)) in expected.iter().enumerate() {
        assert_eq!(outcome.table.row(i), &[*x, *y, 5.0, 5.0]);
    }

    // One zoom per row, a countdown that includes the current node, and a
    // major/minor line pair per node.
    assert_eq!(surface.zoomed_rows, vec![100, 200]);
    let remaining: Vec<usize> = surface.focused.iter().map(|(_, r)| *r).collect();
    assert_eq!(remaining, vec![6, 5, 4, 3, 2, 1]);
    assert_eq!(surface.drawn.len(), 12);
    assert_eq!(surface.drawn[0].axis, Axis::Major);
    assert_eq!(surface.drawn[1].axis, Axis::Minor);
    assert!(surface.restored);
    assert!(surface.finished);
}

#[test]
fn abort_keeps_partial_results_and_zero_rows() {
    // Two complete nodes, then the display goes away.
    let mut picks: Vec<_> = (0..4).map(|_| pick_of_five()).collect();
    picks.push(Err(CaptureError::SurfaceClosed));
    let mut surface = ScriptedSurface::with_picks(picks);
    let outcome = run_session(&mut surface, 350, 250, &config(AxisCount::Two), None);

    assert!(!outcome.completed());
    assert_eq!(outcome.failed_at, Some(GridNode { x: 300, y: 100 }));
    assert_eq!(outcome.table.rows(), 6);
    assert_eq!(outcome.table.filled(), 2);
    for i in 2..6 {
        assert!(outcome.table.row(i).iter().all(|v| *v == 0.0));
    }
    assert_eq!(outcome.lines.len(), 4);
    assert!(!surface.restored);
    assert!(surface.finished);
}

#[test]
fn wrong_point_count_aborts_like_a_closed_surface() {
    // A single-point capture (operator clicked too quickly for the surface).
    let mut surface = ScriptedSurface::with_picks(vec![Ok(vec![[1.0, 1.0]])]);
    let outcome = run_session(&mut surface, 350, 250, &config(AxisCount::Two), None);

    assert!(!outcome.completed());
    assert_eq!(outcome.failed_at, Some(GridNode { x: 100, y: 100 }));
    assert_eq!(outcome.table.filled(), 0);
    assert!(outcome.lines.is_empty());
}

#[test]
fn single_axis_sessions_record_three_columns() {
    let mut surface = ScriptedSurface::with_picks((0..6).map(|_| pick_of_five()).collect());
    let outcome = run_session(&mut surface, 350, 250, &config(AxisCount::One), None);

    assert!(outcome.completed());
    assert_eq!(outcome.table.cols(), 3);
    assert_eq!(outcome.table.filled(), 6);
    assert_eq!(outcome.table.row(0), &[100.0, 100.0, 5.0]);
    assert_eq!(surface.drawn.len(), 6);
    assert!(surface.drawn.iter().all(|l| l.axis == Axis::Major));
}

#[test]
fn empty_grid_completes_without_captures() {
    let mut surface = ScriptedSurface::default();
    let outcome = run_session(&mut surface, 90, 90, &config(AxisCount::Two), None);

    assert!(outcome.completed());
    assert_eq!(outcome.table.rows(), 0);
    assert!(surface.focused.is_empty());
    assert!(surface.restored);
}
