use pointcount::session::{Axis, CaptureError, SessionSurface};
use pointcount::surface::{channel_surface, SurfaceCommand};

#[test]
fn capture_blocks_until_the_ui_supplies_points() {
    let (mut surface, endpoint) = channel_surface();

    // UI side scripted on another thread: wait for the capture request, then
    // click twice.
    let ui = std::thread::spawn(move || {
        let cmd = endpoint.commands.recv().unwrap();
        assert_eq!(
            cmd,
            SurfaceCommand::BeginCapture {
                count: 2,
                axis: Axis::Major
            }
        );
        endpoint.clicks.send([10.0, 20.0]).unwrap();
        endpoint.clicks.send([13.0, 24.0]).unwrap();
        endpoint
    });

    let points = surface.capture_points(2, Axis::Major).unwrap();
    assert_eq!(points, vec![[10.0, 20.0], [13.0, 24.0]]);
    drop(ui.join().unwrap());
}

#[test]
fn stale_clicks_are_discarded_between_captures() {
    let (mut surface, endpoint) = channel_surface();
    // A click that arrived outside any capture window.
    endpoint.clicks.send([1.0, 1.0]).unwrap();

    let ui = std::thread::spawn(move || {
        let _ = endpoint.commands.recv().unwrap();
        endpoint.clicks.send([5.0, 5.0]).unwrap();
        endpoint.clicks.send([8.0, 9.0]).unwrap();
        endpoint
    });

    let points = surface.capture_points(2, Axis::Minor).unwrap();
    assert_eq!(points, vec![[5.0, 5.0], [8.0, 9.0]]);
    drop(ui.join().unwrap());
}

#[test]
fn closed_window_surfaces_as_a_capture_error() {
    let (mut surface, endpoint) = channel_surface();
    drop(endpoint);
    assert_eq!(
        surface.capture_points(2, Axis::Major),
        Err(CaptureError::SurfaceClosed)
    );
}

#[test]
fn presentation_calls_survive_a_closed_ui() {
    // Sends after the window is gone must not panic; the session only learns
    // about the closure at the next capture.
    let (mut surface, endpoint) = channel_surface();
    drop(endpoint);
    surface.focus_node(pointcount::grid::GridNode { x: 100, y: 100 }, 6);
    surface.restore_full_view();
    surface.finish();
}
