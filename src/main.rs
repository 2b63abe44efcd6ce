//! Command-line entry point.
//!
//! Opens the image (or prompts for one), reserves collision-free export
//! names, runs the measurement session on its own thread behind the native
//! window, and writes the table once the session ends. In-session failures
//! abort with partial results but still export; only startup errors are
//! fatal.

use std::path::PathBuf;
use std::thread;

use clap::Parser;

use pointcount::app::run_point_count;
use pointcount::config::PointCountConfig;
use pointcount::export::{self, DataFormat};
use pointcount::figure::{FigureFormat, FigureRequest};
use pointcount::grid::GridSpacing;
use pointcount::naming;
use pointcount::session::run_session;
use pointcount::surface::channel_surface;
use pointcount::table::AxisCount;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "pointcount")]
#[command(about = "Software to make regular manual measurements of grains in an image of sediment")]
#[command(version)]
struct Args {
    /// Image file to use; prompts with a file dialog when omitted.
    #[arg(short = 'i', value_name = "image_file")]
    image_file: Option<PathBuf>,

    /// File type to save the measurement table to.
    #[arg(short = 's', value_enum, default_value = "csv")]
    save: DataFormat,

    /// File type to save the figure to.
    #[arg(long = "sf", value_enum, default_value = "png")]
    save_figure: FigureFormat,

    /// Number of axes to measure for each grain.
    #[arg(long = "nax", value_parser = parse_axis_count, default_value = "2")]
    n_axes: AxisCount,

    /// Grid spacing in pixels.
    #[arg(long = "gs", value_parser = parse_spacing, default_value = "100")]
    grid_spacing: GridSpacing,
}

fn parse_axis_count(s: &str) -> Result<AxisCount, String> {
    match s {
        "1" => Ok(AxisCount::One),
        "2" => Ok(AxisCount::Two),
        other => Err(format!("'{other}' is not a valid axis count (expected 1 or 2)")),
    }
}

fn parse_spacing(s: &str) -> Result<GridSpacing, String> {
    let pixels: u32 = s.parse().map_err(|e| format!("{e}"))?;
    GridSpacing::new(pixels).ok_or_else(|| "grid spacing must be positive".to_owned())
}

fn main() -> CliResult<()> {
    let args = Args::parse();

    let image_path = match args.image_file {
        Some(path) => path,
        None => rfd::FileDialog::new()
            .add_filter("images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"])
            .pick_file()
            .ok_or("no image file selected")?,
    };
    let image = image::open(&image_path)
        .map_err(|e| format!("cannot open image '{}': {e}", image_path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let config = PointCountConfig {
        grid_spacing: args.grid_spacing,
        n_axes: args.n_axes,
        ..Default::default()
    };

    // Reserve both export names up front so the data file and the figure file
    // carry the same counter.
    let (data_path, figure_path) = naming::paired_export_paths(
        &image_path,
        args.save.extension(),
        args.save_figure.extension(),
    )?;

    let (mut surface, endpoint) = channel_surface();
    let session_image = image.clone();
    let session_config = config.clone();
    let figure_format = args.save_figure;
    let session = thread::spawn(move || {
        let request = figure_path.map(|path| FigureRequest {
            image: &session_image,
            path,
            format: figure_format,
        });
        run_session(&mut surface, width, height, &session_config, request)
    });

    run_point_count(endpoint, &image, config)?;

    let outcome = session
        .join()
        .map_err(|_| "measurement session thread panicked")?;
    if !outcome.completed() {
        eprintln!(
            "Session ended early: {} of {} nodes measured",
            outcome.table.filled(),
            outcome.table.rows()
        );
    }

    match data_path {
        None => println!("Data not saved"),
        Some(path) => {
            export::write_table_file(&path, &outcome.table, args.save)?;
            println!("Data saved as {}", path.display());
        }
    }
    Ok(())
}
