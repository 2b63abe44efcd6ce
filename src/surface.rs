//! Channel-backed [`SessionSurface`] used by the native window.
//!
//! The session runs on its own thread and blocks on the click channel while
//! the egui event loop stays responsive. Closing the window drops the UI end
//! of the channels, which the session observes as a closed surface and turns
//! into an abort with partial results.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::grid::{GridNode, GridSpacing};
use crate::session::{Axis, CaptureError, MeasuredLine, SessionSurface};

/// Presentation effects the session pushes to the UI, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceCommand {
    /// Restrict the view to the grid row at `row_y`, ± one spacing.
    ZoomToRow { row_y: u32, spacing: u32 },
    /// Move the node marker and update the remaining-node count.
    FocusNode { node: GridNode, remaining: usize },
    /// Start forwarding clicks; the session expects `count` of them.
    BeginCapture { count: usize, axis: Axis },
    /// Overlay a completed measurement line.
    DrawLine(MeasuredLine),
    /// Zoom back out to the full image.
    RestoreFullView,
    /// The session is over; the window may close.
    Finished,
}

/// UI half of the surface channels, consumed by the native window.
pub struct UiEndpoint {
    pub commands: Receiver<SurfaceCommand>,
    pub clicks: Sender<[f64; 2]>,
}

/// Session half: a [`SessionSurface`] speaking [`SurfaceCommand`]s.
pub struct ChannelSurface {
    commands: Sender<SurfaceCommand>,
    clicks: Receiver<[f64; 2]>,
}

/// Create a connected surface/UI channel pair.
pub fn channel_surface() -> (ChannelSurface, UiEndpoint) {
    let (cmd_tx, cmd_rx) = channel();
    let (click_tx, click_rx) = channel();
    (
        ChannelSurface {
            commands: cmd_tx,
            clicks: click_rx,
        },
        UiEndpoint {
            commands: cmd_rx,
            clicks: click_tx,
        },
    )
}

impl ChannelSurface {
    fn send(&self, cmd: SurfaceCommand) {
        // A dropped UI end surfaces as an error on the next capture.
        let _ = self.commands.send(cmd);
    }
}

impl SessionSurface for ChannelSurface {
    fn zoom_to_row(&mut self, row_y: u32, spacing: GridSpacing) {
        self.send(SurfaceCommand::ZoomToRow {
            row_y,
            spacing: spacing.pixels(),
        });
    }

    fn focus_node(&mut self, node: GridNode, remaining: usize) {
        self.send(SurfaceCommand::FocusNode { node, remaining });
    }

    fn capture_points(&mut self, count: usize, axis: Axis) -> Result<Vec<[f64; 2]>, CaptureError> {
        // Discard clicks that arrived outside any capture window.
        while self.clicks.try_recv().is_ok() {}
        self.commands
            .send(SurfaceCommand::BeginCapture { count, axis })
            .map_err(|_| CaptureError::SurfaceClosed)?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            let point = self
                .clicks
                .recv()
                .map_err(|_| CaptureError::SurfaceClosed)?;
            points.push(point);
        }
        Ok(points)
    }

    fn draw_line(&mut self, line: MeasuredLine) {
        self.send(SurfaceCommand::DrawLine(line));
    }

    fn restore_full_view(&mut self) {
        self.send(SurfaceCommand::RestoreFullView);
    }

    fn finish(&mut self) {
        self.send(SurfaceCommand::Finished);
    }
}
