//! Line chart of the error trajectory, rendered straight into an RGB buffer.
//!
//! Layout: white background, grey axes along the left and bottom margins,
//! a green polyline through the samples and a small red marker on each one.
//! Non-finite samples are skipped when drawing; they break the line.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::error::ReportError;
use crate::train::history::ErrorHistory;

const MARGIN: u32 = 24;

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub axis: Rgb<u8>,
    pub line: Rgb<u8>,
    pub marker: Rgb<u8>,
    /// Marker half-width in pixels; 0 disables markers.
    pub marker_radius: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            width: 400,
            height: 400,
            background: Rgb([255, 255, 255]),
            axis: Rgb([96, 96, 96]),
            line: Rgb([0, 255, 0]),
            marker: Rgb([255, 0, 0]),
            marker_radius: 2,
        }
    }
}

/// Renders `history` into an image. X is the epoch, Y the error.
pub fn draw_error_chart(history: &ErrorHistory, style: &ChartStyle) -> Result<RgbImage, ReportError> {
    if history.is_empty() {
        return Err(ReportError::EmptyHistory);
    }
    let min_side = 2 * MARGIN + 2;
    if style.width < min_side || style.height < min_side {
        return Err(ReportError::ChartTooSmall { min: min_side });
    }

    let mut img = RgbImage::from_pixel(style.width, style.height, style.background);
    let plot = PlotArea::new(history, style);

    let (left, bottom) = (MARGIN as i64, (style.height - MARGIN) as i64);
    draw_line(&mut img, (left, MARGIN as i64), (left, bottom), style.axis);
    draw_line(&mut img, (left, bottom), ((style.width - MARGIN) as i64, bottom), style.axis);

    let points: Vec<Option<(i64, i64)>> = history
        .samples()
        .iter()
        .map(|s| plot.project(s.epoch, s.mean_abs_error))
        .collect();

    for pair in points.windows(2) {
        if let [Some(a), Some(b)] = pair {
            draw_line(&mut img, *a, *b, style.line);
        }
    }
    for p in points.iter().flatten() {
        draw_marker(&mut img, *p, style.marker_radius, style.marker);
    }

    Ok(img)
}

/// Renders `history` and saves it as a PNG at `path`.
pub fn render_error_chart(
    history: &ErrorHistory,
    style: &ChartStyle,
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let img = draw_error_chart(history, style)?;
    img.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    info!(path = %path.as_ref().display(), samples = history.len(), "wrote error chart");
    Ok(())
}

/// Maps (epoch, error) into pixel coordinates inside the margins.
struct PlotArea {
    x0: f64,
    x_span: f64,
    y0: f64,
    y_span: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(history: &ErrorHistory, style: &ChartStyle) -> PlotArea {
        let epochs = history.samples().iter().map(|s| s.epoch as f64);
        let x0 = epochs.clone().fold(f64::INFINITY, f64::min);
        let x1 = epochs.fold(f64::NEG_INFINITY, f64::max);

        let finite = history
            .samples()
            .iter()
            .map(|s| s.mean_abs_error)
            .filter(|v| v.is_finite());
        let y0 = finite.clone().fold(f64::INFINITY, f64::min);
        let y1 = finite.fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = if y0.is_finite() { (y0, y1) } else { (0.0, 1.0) };

        PlotArea {
            x0,
            x_span: span(x0, x1),
            y0,
            y_span: span(y0, y1),
            width: (style.width - 2 * MARGIN - 1) as f64,
            height: (style.height - 2 * MARGIN - 1) as f64,
        }
    }

    fn project(&self, epoch: usize, value: f64) -> Option<(i64, i64)> {
        if !value.is_finite() {
            return None;
        }
        let fx = (epoch as f64 - self.x0) / self.x_span;
        let fy = (value - self.y0) / self.y_span;
        let px = MARGIN as f64 + 1.0 + fx * (self.width - 1.0);
        let py = MARGIN as f64 + (1.0 - fy) * (self.height - 1.0);
        Some((px.round() as i64, py.round() as i64))
    }
}

/// Width of [lo, hi], widened to 1 when every value is identical.
fn span(lo: f64, hi: f64) -> f64 {
    if hi > lo {
        hi - lo
    } else {
        1.0
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixel coordinates.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_marker(img: &mut RgbImage, center: (i64, i64), radius: u32, color: Rgb<u8>) {
    let r = radius as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            put(img, center.0 + dx, center.1 + dy, color);
        }
    }
}
