//! Native measurement window.
//!
//! Renders the sediment image in an [`egui_plot`] plot in pixel coordinates
//! (y negated so the image reads top-down like in an image viewer), overlays
//! the sampling grid, the current-node marker and the measurement lines, and
//! forwards plot clicks to the session thread while a capture is active.

use eframe::egui::{self, Color32, ViewportCommand};
use egui_plot::{Line, Plot, PlotImage, PlotPoint, Points};
use image::RgbaImage;

use crate::config::{PointCountConfig, GRID_COLOR, MARKER_COLOR};
use crate::session::{Axis, MeasuredLine};
use crate::surface::{SurfaceCommand, UiEndpoint};

struct CaptureState {
    want: usize,
    got: usize,
    axis: Axis,
}

/// One pending plot-bounds change, in plot coordinates (y negated).
struct PendingBounds {
    x: (f64, f64),
    y: (f64, f64),
}

pub struct PointCountApp {
    endpoint: UiEndpoint,
    config: PointCountConfig,
    /// Decoded image, consumed into a GPU texture on the first frame.
    source: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
    img_w: u32,
    img_h: u32,
    status: String,
    marker: Option<[f64; 2]>,
    capture: Option<CaptureState>,
    /// Clicks of the active capture, shown as preview dots.
    preview: Vec<[f64; 2]>,
    lines: Vec<MeasuredLine>,
    pending_bounds: Option<PendingBounds>,
    done: bool,
}

impl PointCountApp {
    pub fn new(endpoint: UiEndpoint, image: &RgbaImage, config: PointCountConfig) -> Self {
        let (img_w, img_h) = image.dimensions();
        let source = egui::ColorImage::from_rgba_unmultiplied(
            [img_w as usize, img_h as usize],
            image.as_raw(),
        );
        Self {
            endpoint,
            config,
            source: Some(source),
            texture: None,
            img_w,
            img_h,
            status: String::new(),
            marker: None,
            capture: None,
            preview: Vec::new(),
            lines: Vec::new(),
            pending_bounds: None,
            done: false,
        }
    }

    fn full_bounds(&self) -> PendingBounds {
        PendingBounds {
            x: (0.0, self.img_w as f64),
            y: (-(self.img_h as f64), 0.0),
        }
    }

    fn apply_command(&mut self, cmd: SurfaceCommand) {
        match cmd {
            SurfaceCommand::ZoomToRow { row_y, spacing } => {
                self.pending_bounds = Some(PendingBounds {
                    x: (0.0, self.img_w as f64),
                    y: (
                        -((row_y + spacing) as f64),
                        -(row_y as f64 - spacing as f64),
                    ),
                });
            }
            SurfaceCommand::FocusNode { node, remaining } => {
                self.marker = Some(node.position());
                self.status = format!(
                    "x = {} , y = {}  |  nodes remaining = {remaining}",
                    node.x, node.y
                );
            }
            SurfaceCommand::BeginCapture { count, axis } => {
                self.capture = Some(CaptureState {
                    want: count,
                    got: 0,
                    axis,
                });
                self.preview.clear();
            }
            SurfaceCommand::DrawLine(line) => {
                self.lines.push(line);
                self.preview.clear();
            }
            SurfaceCommand::RestoreFullView => {
                self.pending_bounds = Some(self.full_bounds());
                self.marker = None;
                self.status = "All nodes measured".to_owned();
            }
            SurfaceCommand::Finished => {
                self.done = true;
            }
        }
    }

    fn axis_color32(&self, axis: Axis) -> Color32 {
        let [r, g, b] = self.config.axis_color(axis);
        Color32::from_rgb(r, g, b)
    }

    fn forward_click(&mut self, pixel: [f64; 2]) {
        let Some(capture) = &mut self.capture else {
            return;
        };
        if self.endpoint.clicks.send(pixel).is_ok() {
            capture.got += 1;
            self.preview.push(pixel);
            if capture.got >= capture.want {
                self.capture = None;
            }
        }
    }
}

impl eframe::App for PointCountApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(cmd) = self.endpoint.commands.try_recv() {
            self.apply_command(cmd);
        }

        if self.done {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        let texture = self
            .texture
            .get_or_insert_with(|| {
                let source = self.source.take().unwrap_or_default();
                ctx.load_texture("sediment_image", source, egui::TextureOptions::NEAREST)
            })
            .clone();

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!(
                    "{} {}",
                    egui_phosphor::regular::CROSSHAIR,
                    self.config.title
                ));
                ui.separator();
                ui.label(&self.status);
                if let Some(capture) = &self.capture {
                    let axis_name = match capture.axis {
                        Axis::Major => "major",
                        Axis::Minor => "minor",
                    };
                    let left = capture.want - capture.got;
                    ui.separator();
                    ui.colored_label(
                        self.axis_color32(capture.axis),
                        format!("click {left} more point(s) for the {axis_name} axis"),
                    );
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (img_w, img_h) = (self.img_w as f64, self.img_h as f64);
            let spacing = self.config.grid_spacing.pixels();
            let pending = self.pending_bounds.take();
            let grid_color = Color32::from_rgb(GRID_COLOR[0], GRID_COLOR[1], GRID_COLOR[2]);
            let marker_color =
                Color32::from_rgb(MARKER_COLOR[0], MARKER_COLOR[1], MARKER_COLOR[2]);

            let plot = Plot::new("image_plot")
                .data_aspect(1.0)
                .allow_scroll(false)
                .x_axis_label("Location (pixels)")
                .y_axis_label("Location (pixels)")
                .y_axis_formatter(|y, _range| format!("{}", -y.value));

            let response = plot.show(ui, |plot_ui| {
                plot_ui.image(PlotImage::new(
                    "sediment",
                    &texture,
                    PlotPoint::new(img_w / 2.0, -img_h / 2.0),
                    egui::vec2(self.img_w as f32, self.img_h as f32),
                ));

                // Sampling grid, one line per spacing in both directions.
                let mut x = spacing;
                while (x as f64) < img_w {
                    plot_ui.line(
                        Line::new("", vec![[x as f64, 0.0], [x as f64, -img_h]])
                            .color(grid_color)
                            .width(0.5),
                    );
                    x += spacing;
                }
                let mut y = spacing;
                while (y as f64) < img_h {
                    plot_ui.line(
                        Line::new("", vec![[0.0, -(y as f64)], [img_w, -(y as f64)]])
                            .color(grid_color)
                            .width(0.5),
                    );
                    y += spacing;
                }

                for line in &self.lines {
                    let [r, g, b] = self.config.axis_color(line.axis);
                    plot_ui.line(
                        Line::new(
                            "",
                            vec![
                                [line.pick.a[0], -line.pick.a[1]],
                                [line.pick.b[0], -line.pick.b[1]],
                            ],
                        )
                        .color(Color32::from_rgb(r, g, b))
                        .width(2.0),
                    );
                }

                for p in &self.preview {
                    plot_ui.points(
                        Points::new("", vec![[p[0], -p[1]]])
                            .radius(4.0)
                            .color(Color32::YELLOW),
                    );
                }

                if let Some(m) = self.marker {
                    plot_ui.points(
                        Points::new("", vec![[m[0], -m[1]]])
                            .radius(4.0)
                            .color(marker_color),
                    );
                }

                if let Some(bounds) = pending {
                    plot_ui.set_plot_bounds_x(bounds.x.0..=bounds.x.1);
                    plot_ui.set_plot_bounds_y(bounds.y.0..=bounds.y.1);
                }
            });

            // Forward plot clicks while a capture is active.
            if self.capture.is_some() && response.response.clicked() {
                if let Some(screen_pos) = response.response.interact_pointer_pos() {
                    let plot_pos = response.transform.value_from_position(screen_pos);
                    self.forward_click([plot_pos.x, -plot_pos.y]);
                }
            }
        });

        // Keep polling the session channel.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));
    }
}

/// Open the native measurement window. Blocks until the window closes.
pub fn run_point_count(
    endpoint: UiEndpoint,
    image: &RgbaImage,
    config: PointCountConfig,
) -> eframe::Result<()> {
    let title = config.title.clone();
    let app = PointCountApp::new(endpoint, image, config);

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1400.0, 900.0))
        .with_maximized(true);
    if let Some(icon) = load_app_icon_svg() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// Attempt to load the project's `icon.svg` as an [`egui::IconData`].
fn load_app_icon_svg() -> Option<egui::IconData> {
    let svg_path = concat!(env!("CARGO_MANIFEST_DIR"), "/icon.svg");
    let data = std::fs::read(svg_path).ok()?;

    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(&data, &opt).ok()?;
    let size = tree.size().to_int_size();
    if size.width() == 0 || size.height() == 0 {
        return None;
    }
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    let mut canvas = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::default(), &mut canvas);
    let rgba = pixmap.take();
    Some(egui::IconData {
        rgba,
        width: size.width(),
        height: size.height(),
    })
}
