//! Price labels pinned to the right edge of the pane, each a filled box
//! with text, vertically centred on its price.

use crate::domain::error::PlotlineError;
use crate::domain::render::PaneRenderer;
use crate::domain::render::geometry::centered_bar_geometry;
use crate::ports::canvas_port::{RenderTarget, TextAlign, TextBaseline};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLabel {
    pub price: f64,
    pub text: String,
    pub background: String,
    pub text_color: String,
}

impl PriceLabel {
    /// Label showing the price itself with `precision` decimals.
    pub fn for_price(price: f64, precision: usize, background: &str) -> Self {
        PriceLabel {
            price,
            text: format!("{price:.precision$}"),
            background: background.to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceScaleLabelsOptions {
    pub font_size: f64,
    pub font_family: String,
    /// Media pixels between text and box edge.
    pub padding: f64,
}

impl Default for PriceScaleLabelsOptions {
    fn default() -> Self {
        PriceScaleLabelsOptions {
            font_size: 12.0,
            font_family: "sans-serif".to_string(),
            padding: 4.0,
        }
    }
}

#[derive(Default)]
pub struct PriceScaleLabelsRenderer {
    labels: Vec<PriceLabel>,
    options: Option<PriceScaleLabelsOptions>,
}

impl PriceScaleLabelsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, labels: Vec<PriceLabel>, options: PriceScaleLabelsOptions) {
        self.labels = labels;
        self.options = Some(options);
    }
}

impl PaneRenderer for PriceScaleLabelsRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        if self.labels.is_empty() || target.space.visible_range().is_none() {
            return Ok(());
        }

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        let box_height = (options.font_size + 2.0 * options.padding) * vpr;
        let padding = options.padding * hpr;
        let right = target.scope.bitmap_width;

        target.context.set_font(&format!(
            "{}px {}",
            options.font_size * vpr,
            options.font_family
        ));
        target.context.set_text_align(TextAlign::Right);
        target.context.set_text_baseline(TextBaseline::Middle);

        for label in &self.labels {
            if label.text.is_empty() {
                continue;
            }
            let Some(y) = target.space.price_to_coordinate(label.price) else {
                continue;
            };
            let row = centered_bar_geometry(y, vpr, box_height);
            let box_width = (target.context.measure_text(&label.text) + 2.0 * padding).round();

            target.context.set_fill_style(&label.background);
            target.context.fill_rect(
                right - box_width,
                row.position as f64,
                box_width,
                row.length as f64,
            );
            target.context.set_fill_style(&label.text_color);
            target
                .context
                .fill_text(&label.text, right - padding, (y * vpr).round());
        }
        Ok(())
    }
}
