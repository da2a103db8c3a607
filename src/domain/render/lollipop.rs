//! Lollipop markers: a stem from a baseline price up to each value, capped
//! with a filled circle.

use crate::domain::bar::DerivedPoint;
use crate::domain::error::PlotlineError;
use crate::domain::render::geometry::{centered_bar_geometry, media_to_bitmap_width, span_geometry};
use crate::domain::render::{PaneRenderer, visible_slice};
use crate::ports::canvas_port::RenderTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct LollipopOptions {
    pub color: String,
    /// Stem width in media pixels.
    pub line_width: f64,
    /// Head radius in media pixels.
    pub radius: f64,
    pub baseline: f64,
}

impl Default for LollipopOptions {
    fn default() -> Self {
        LollipopOptions {
            color: "#2962ff".to_string(),
            line_width: 1.0,
            radius: 3.0,
            baseline: 0.0,
        }
    }
}

#[derive(Default)]
pub struct LollipopRenderer {
    data: Vec<DerivedPoint>,
    options: Option<LollipopOptions>,
}

impl LollipopRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: Vec<DerivedPoint>, options: LollipopOptions) {
        self.data = data;
        self.options = Some(options);
    }
}

impl PaneRenderer for LollipopRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let Some(range) = target.space.visible_range() else {
            return Ok(());
        };
        if self.data.is_empty() {
            return Ok(());
        }
        let Some(base_y) = target.space.price_to_coordinate(options.baseline) else {
            return Ok(());
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        let stem_width = media_to_bitmap_width(options.line_width, hpr);
        let radius = options.radius * hpr;

        target.context.set_fill_style(&options.color);
        for point in visible_slice(&self.data, range, |p| p.time) {
            let Some(value) = point.value else { continue };
            let (Some(x), Some(y)) = (
                target.space.time_to_coordinate(point.time),
                target.space.price_to_coordinate(value),
            ) else {
                continue;
            };

            let column = centered_bar_geometry(x, hpr, stem_width);
            let stem = span_geometry(base_y, y, vpr);
            target.context.fill_rect(
                column.position as f64,
                stem.position as f64,
                column.length as f64,
                stem.length as f64,
            );

            target.context.begin_path();
            target.context.arc((x * hpr).round(), (y * vpr).round(), radius);
            target.context.fill();
        }
        Ok(())
    }
}
