//! High-low-close band: a filled area between the high and low lines with
//! all three lines stroked on top.

use crate::domain::error::PlotlineError;
use crate::domain::render::{PaneRenderer, visible_slice};
use crate::ports::canvas_port::RenderTarget;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HlcPoint {
    pub time: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl HlcPoint {
    pub fn new(time: f64, high: f64, low: f64, close: f64) -> Self {
        HlcPoint {
            time,
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HlcAreaOptions {
    pub high_line_color: String,
    pub low_line_color: String,
    pub close_line_color: String,
    pub area_color: String,
    pub line_width: f64,
}

impl Default for HlcAreaOptions {
    fn default() -> Self {
        HlcAreaOptions {
            high_line_color: "#089981".to_string(),
            low_line_color: "#f23645".to_string(),
            close_line_color: "#2962ff".to_string(),
            area_color: "rgba(41, 98, 255, 0.2)".to_string(),
            line_width: 2.0,
        }
    }
}

/// Bitmap coordinates of one fully defined bar.
struct BandPoint {
    x: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Default)]
pub struct HlcAreaRenderer {
    data: Vec<HlcPoint>,
    options: Option<HlcAreaOptions>,
}

impl HlcAreaRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: Vec<HlcPoint>, options: HlcAreaOptions) {
        self.data = data;
        self.options = Some(options);
    }
}

fn stroke_line(target: &mut RenderTarget<'_>, color: &str, points: &[BandPoint], y: fn(&BandPoint) -> f64) {
    target.context.set_stroke_style(color);
    target.context.begin_path();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            target.context.move_to(p.x, y(p));
        } else {
            target.context.line_to(p.x, y(p));
        }
    }
    target.context.stroke();
}

impl PaneRenderer for HlcAreaRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let Some(range) = target.space.visible_range() else {
            return Ok(());
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        let space = target.space;
        let points: Vec<BandPoint> = visible_slice(&self.data, range, |p| p.time)
            .iter()
            .filter_map(|p| {
                Some(BandPoint {
                    x: space.time_to_coordinate(p.time)? * hpr,
                    high: space.price_to_coordinate(p.high?)? * vpr,
                    low: space.price_to_coordinate(p.low?)? * vpr,
                    close: space.price_to_coordinate(p.close?)? * vpr,
                })
            })
            .collect();
        if points.is_empty() {
            return Ok(());
        }

        target.context.set_fill_style(&options.area_color);
        target.context.begin_path();
        target.context.move_to(points[0].x, points[0].high);
        for p in &points[1..] {
            target.context.line_to(p.x, p.high);
        }
        for p in points.iter().rev() {
            target.context.line_to(p.x, p.low);
        }
        target.context.close_path();
        target.context.fill();

        target.context.set_line_width(options.line_width * hpr);
        stroke_line(target, &options.high_line_color, &points, |p| p.high);
        stroke_line(target, &options.low_line_color, &points, |p| p.low);
        stroke_line(target, &options.close_line_color, &points, |p| p.close);
        Ok(())
    }
}
