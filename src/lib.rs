//! pointcount crate root: re-exports and module wiring.
//!
//! Manual grain-size point counting on sediment images: a session walks the
//! operator over a regular grid of nodes, captures two clicks per grain axis
//! at each node and records pixel distances into a pre-sized table, which is
//! then exported as CSV or a binary table alongside an optional rendered
//! figure.
//!
//! Module map:
//! - `geometry`: Euclidean distance
//! - `grid`: sampling-grid enumeration
//! - `table`: pre-sized measurement table
//! - `session`: the interactive measurement loop and its surface trait
//! - `surface`: channel-backed surface used by the native window
//! - `naming`: collision-free export file names
//! - `export`: CSV / binary / optional Parquet table exports
//! - `figure`: offscreen rendering of the finished session
//! - `app`: the eframe window

mod line_draw;

pub mod app;
pub mod config;
pub mod export;
pub mod figure;
pub mod geometry;
pub mod grid;
pub mod naming;
pub mod session;
pub mod surface;
pub mod table;

// Public re-exports for a compact external API
pub use app::{run_point_count, PointCountApp};
pub use config::PointCountConfig;
pub use export::DataFormat;
pub use figure::{FigureFormat, FigureRequest};
pub use grid::{node_count, nodes, GridNode, GridSpacing};
pub use naming::{paired_export_paths, unique_export_path};
pub use session::{run_session, Axis, CaptureError, LinePick, MeasuredLine, SessionOutcome, SessionSurface};
pub use surface::{channel_surface, ChannelSurface, SurfaceCommand, UiEndpoint};
pub use table::{AxisCount, Measurement, ResultTable};
