//! Recording drawing context and a fixed coordinate space for renderer tests.

use crate::ports::canvas_port::{
    BitmapScope, CoordinateSpace, DrawingContext, ImageHandle, RenderTarget, TextAlign,
    TextBaseline,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Fill(String),
    Stroke(String),
    LineWidth(f64),
    Alpha(f64),
    Rect(f64, f64, f64, f64),
    Begin,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc(f64, f64, f64),
    Close,
    FillPath,
    StrokePath,
    Font(String),
    Align(TextAlign),
    Baseline(TextBaseline),
    Text(String, f64, f64),
    Image(String, f64, f64, f64, f64),
}

#[derive(Default)]
pub struct RecordingContext {
    pub ops: Vec<Op>,
}

impl RecordingContext {
    pub fn rects(&self) -> Vec<(f64, f64, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Rect(x, y, w, h) => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DrawingContext for RecordingContext {
    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(Op::Fill(color.to_string()));
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(Op::Stroke(color.to_string()));
    }
    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::LineWidth(width));
    }
    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(Op::Alpha(alpha));
    }
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(Op::Rect(x, y, width, height));
    }
    fn begin_path(&mut self) {
        self.ops.push(Op::Begin);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        self.ops.push(Op::Arc(x, y, radius));
    }
    fn close_path(&mut self) {
        self.ops.push(Op::Close);
    }
    fn fill(&mut self) {
        self.ops.push(Op::FillPath);
    }
    fn stroke(&mut self) {
        self.ops.push(Op::StrokePath);
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_string()));
    }
    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(Op::Align(align));
    }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(Op::Baseline(baseline));
    }
    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * 6.0
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(Op::Text(text.to_string(), x, y));
    }
    fn draw_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64) {
        self.ops
            .push(Op::Image(image.source.clone(), x, y, width, height));
    }
}

/// time -> x = time, price -> y = 100 - price, on a 100x100 media pane.
pub struct IdentitySpace {
    pub range: Option<(f64, f64)>,
    pub spacing: f64,
}

impl Default for IdentitySpace {
    fn default() -> Self {
        IdentitySpace {
            range: Some((0.0, 100.0)),
            spacing: 10.0,
        }
    }
}

impl CoordinateSpace for IdentitySpace {
    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        Some(100.0 - price)
    }
    fn time_to_coordinate(&self, time: f64) -> Option<f64> {
        Some(time)
    }
    fn bar_spacing(&self) -> f64 {
        self.spacing
    }
    fn visible_range(&self) -> Option<(f64, f64)> {
        self.range
    }
    fn pane_size(&self) -> (f64, f64) {
        (100.0, 100.0)
    }
}

pub fn draw_with<F>(space: &IdentitySpace, pixel_ratio: f64, draw: F) -> RecordingContext
where
    F: FnOnce(&mut RenderTarget<'_>),
{
    let mut ctx = RecordingContext::default();
    {
        let mut target = RenderTarget {
            context: &mut ctx,
            scope: BitmapScope::new(100.0, 100.0, pixel_ratio),
            space,
        };
        draw(&mut target);
    }
    ctx
}
