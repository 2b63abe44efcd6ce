//! Offscreen rendering of a finished session: the source image with every
//! measurement line overlaid, saved as PNG or as a single-page PDF embedding
//! the rendered raster.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::config::PointCountConfig;
use crate::line_draw::draw_segment;
use crate::session::MeasuredLine;

const LINE_BRUSH: u32 = 3;

/// Figure export format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FigureFormat {
    #[default]
    Png,
    Pdf,
    /// Skip the figure export entirely.
    None,
}

impl FigureFormat {
    /// File extension for this format, `None` when the export is disabled.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            FigureFormat::Png => Some("png"),
            FigureFormat::Pdf => Some("pdf"),
            FigureFormat::None => None,
        }
    }
}

/// Where and how to save the session figure.
#[derive(Debug)]
pub struct FigureRequest<'a> {
    /// Decoded source image the session ran over.
    pub image: &'a RgbaImage,
    pub path: PathBuf,
    pub format: FigureFormat,
}

#[derive(Debug, Error)]
pub enum FigureError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Source image with all measurement lines drawn on top, in axis colors.
pub fn render_figure(
    image: &RgbaImage,
    lines: &[MeasuredLine],
    config: &PointCountConfig,
) -> RgbaImage {
    let mut out = image.clone();
    for line in lines {
        let [r, g, b] = config.axis_color(line.axis);
        draw_segment(
            &mut out,
            line.pick.a,
            line.pick.b,
            LINE_BRUSH,
            Rgba([r, g, b, 255]),
        );
    }
    out
}

/// Render and save the session figure in the requested format.
pub fn save_figure(
    request: &FigureRequest<'_>,
    lines: &[MeasuredLine],
    config: &PointCountConfig,
) -> Result<(), FigureError> {
    let rendered = render_figure(request.image, lines, config);
    match request.format {
        FigureFormat::Png => rendered.save(&request.path)?,
        FigureFormat::Pdf => write_pdf(&request.path, &rendered)?,
        FigureFormat::None => {}
    }
    Ok(())
}

/// Write a minimal one-page PDF with the rendered raster as an uncompressed
/// DeviceRGB image XObject, one pixel per point.
fn write_pdf(path: &Path, image: &RgbaImage) -> Result<(), FigureError> {
    let (w, h) = image.dimensions();
    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let contents = format!("q {w} 0 0 {h} 0 0 cm /Im0 Do Q");

    let mut buf: Vec<u8> = Vec::with_capacity(rgb.len() + 1024);
    buf.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(5);

    let begin_obj = |buf: &mut Vec<u8>, n: usize, offsets: &mut Vec<usize>| {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{n} 0 obj\n").as_bytes());
    };

    begin_obj(&mut buf, 1, &mut offsets);
    buf.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    begin_obj(&mut buf, 2, &mut offsets);
    buf.extend_from_slice(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");
    begin_obj(&mut buf, 3, &mut offsets);
    buf.extend_from_slice(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w} {h}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>\nendobj\n"
        )
        .as_bytes(),
    );
    begin_obj(&mut buf, 4, &mut offsets);
    buf.extend_from_slice(
        format!(
            "<< /Type /XObject /Subtype /Image /Width {w} /Height {h} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>\nstream\n",
            rgb.len()
        )
        .as_bytes(),
    );
    buf.extend_from_slice(&rgb);
    buf.extend_from_slice(b"\nendstream\nendobj\n");
    begin_obj(&mut buf, 5, &mut offsets);
    buf.extend_from_slice(
        format!("<< /Length {} >>\nstream\n{contents}\nendstream\nendobj\n", contents.len())
            .as_bytes(),
    );

    let xref_at = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for off in &offsets {
        buf.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            offsets.len() + 1
        )
        .as_bytes(),
    );

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&buf)?;
    Ok(())
}
