use crate::error::LiveError;
use crate::playback::{Frame, Renderer};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const FIGURE_SIZE: (u32, u32) = (1300, 600);
pub const BAR_WIDTH: f64 = 0.7;

/// The chart style, selected on the command line by code 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line,
    Bar,
    StackedBar,
}

impl PlotKind {
    pub fn from_code(code: u8) -> Option<PlotKind> {
        match code {
            0 => Some(PlotKind::Line),
            1 => Some(PlotKind::Bar),
            2 => Some(PlotKind::StackedBar),
            _ => None,
        }
    }
}

impl FromStr for PlotKind {
    type Err = LiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let kind = match name.as_str() {
            "line" => Some(PlotKind::Line),
            "bar" => Some(PlotKind::Bar),
            "stacked" | "stacked-bar" => Some(PlotKind::StackedBar),
            code => code.parse::<u8>().ok().and_then(PlotKind::from_code),
        };
        kind.ok_or_else(|| LiveError::InvalidArgument {
            name: "type",
            reason: format!("`{}` is not one of 0 (line), 1 (bar), 2 (stacked bar)", name),
        })
    }
}

/// Everything about the figure that stays fixed for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub size: (u32, u32),
    pub font: String,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub legend: (String, String),
    pub output: PathBuf,
    pub keep_frames: bool,
}

impl RenderConfig {
    pub fn new(output: PathBuf, font: &str) -> RenderConfig {
        RenderConfig {
            size: FIGURE_SIZE,
            font: font.to_string(),
            title: String::from("chart"),
            x_desc: String::from("time"),
            y_desc: String::from("prediction"),
            legend: (String::from("absent"), String::from("present")),
            output,
            keep_frames: false,
        }
    }

    /// the file a frame is drawn to, numbered when every frame is kept
    pub fn frame_path(&self, position: usize) -> PathBuf {
        if !self.keep_frames {
            return self.output.clone();
        }
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("frame"));
        let ext = self
            .output
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("svg"));
        self.output
            .with_file_name(format!("{}_{:04}.{}", stem, position, ext))
    }
}

fn is_bitmap(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Redraws the whole chart for every frame, to svg or png depending on the output extension.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: RenderConfig,
}

impl ChartRenderer {
    pub fn new(config: RenderConfig) -> ChartRenderer {
        ChartRenderer { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl Renderer for ChartRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Box<dyn Error>> {
        let path = self.config.frame_path(frame.position);
        if is_bitmap(&path) {
            let root = BitMapBackend::new(&path, self.config.size).into_drawing_area();
            draw_frame(&root, &self.config, frame)?;
            root.present()?;
        } else {
            let root = SVGBackend::new(&path, self.config.size).into_drawing_area();
            draw_frame(&root, &self.config, frame)?;
            root.present()?;
        }
        Ok(())
    }
}

/// x positions are slot indices; only whole indices carry a label
fn slot_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0. {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn bar(i: usize, bottom: f64, top: f64, style: ShapeStyle) -> Rectangle<(f64, f64)> {
    let x = i as f64;
    Rectangle::new(
        [(x - BAR_WIDTH / 2., bottom), (x + BAR_WIDTH / 2., top)],
        style,
    )
}

fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    config: &RenderConfig,
    frame: &Frame<'_>,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let n = frame.labels.len();
    let font = config.font.as_str();
    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, (font, 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..frame.y_ceiling)?;
    let labels = frame.labels;
    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
        .label_style((font, 16))
        .x_labels(n)
        .x_label_formatter(&|x: &f64| slot_label(labels, *x))
        .y_label_formatter(&|y: &f64| format!("{}", y))
        .x_desc(config.x_desc.as_str())
        .y_desc(config.y_desc.as_str())
        .draw()?;

    match frame.kind {
        PlotKind::Line => {
            let reached = &frame.values[..=frame.position.min(n.saturating_sub(1))];
            let points = || reached.iter().enumerate().map(|(i, &v)| (i as f64, v as f64));
            chart
                .draw_series(LineSeries::new(points(), BLUE.mix(0.5).stroke_width(2)))?
                .label(config.legend.0.as_str())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
            chart.draw_series(points().map(|p| Circle::new(p, 4, BLUE.mix(0.5).filled())))?;
        }
        PlotKind::Bar | PlotKind::StackedBar => {
            chart
                .draw_series(
                    frame
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| bar(i, 0., v as f64, RED.mix(0.5).filled())),
                )?
                .label(config.legend.0.as_str())
                .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.mix(0.5).filled()));
            if frame.kind == PlotKind::StackedBar {
                // headroom up to the ceiling, only over slots already reached
                chart
                    .draw_series(frame.values.iter().enumerate().map(|(i, &v)| {
                        let top = if v != 0 { frame.y_ceiling } else { 0. };
                        bar(i, v as f64, top.max(v as f64), BLUE.mix(0.5).filled())
                    }))?
                    .label(config.legend.1.as_str())
                    .legend(|(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.5).filled())
                    });
            }
        }
    }

    chart
        .configure_series_labels()
        .label_font((font, 15))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
