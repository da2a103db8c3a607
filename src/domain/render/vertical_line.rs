//! Full-height vertical marker at a single time, with an optional label
//! along the top edge.

use crate::domain::error::PlotlineError;
use crate::domain::render::PaneRenderer;
use crate::domain::render::geometry::{centered_bar_geometry, media_to_bitmap_width};
use crate::ports::canvas_port::{RenderTarget, TextAlign, TextBaseline};

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLineOptions {
    pub color: String,
    pub width: f64,
    pub label: Option<String>,
    pub label_color: String,
    pub font_size: f64,
}

impl Default for VerticalLineOptions {
    fn default() -> Self {
        VerticalLineOptions {
            color: "#787b86".to_string(),
            width: 1.0,
            label: None,
            label_color: "#131722".to_string(),
            font_size: 12.0,
        }
    }
}

#[derive(Default)]
pub struct VerticalLineRenderer {
    time: Option<f64>,
    options: Option<VerticalLineOptions>,
}

impl VerticalLineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, time: f64, options: VerticalLineOptions) {
        self.time = Some(time);
        self.options = Some(options);
    }
}

impl PaneRenderer for VerticalLineRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let (Some(time), Some(options)) = (self.time, &self.options) else {
            return Ok(());
        };
        if target.space.visible_range().is_none() {
            return Ok(());
        }
        let Some(x) = target.space.time_to_coordinate(time) else {
            return Ok(());
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let column = centered_bar_geometry(x, hpr, media_to_bitmap_width(options.width, hpr));
        target.context.set_fill_style(&options.color);
        target.context.fill_rect(
            column.position as f64,
            0.0,
            column.length as f64,
            target.scope.bitmap_height,
        );

        if let Some(label) = options.label.as_deref().filter(|l| !l.is_empty()) {
            let vpr = target.scope.vertical_pixel_ratio;
            target
                .context
                .set_font(&format!("{}px sans-serif", options.font_size * vpr));
            target.context.set_fill_style(&options.label_color);
            target.context.set_text_align(TextAlign::Center);
            target.context.set_text_baseline(TextBaseline::Top);
            target.context.fill_text(label, (x * hpr).round(), 4.0 * vpr);
        }
        Ok(())
    }
}
