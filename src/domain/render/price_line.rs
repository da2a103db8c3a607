//! Full-width horizontal line at a fixed price, optionally titled.

use crate::domain::error::PlotlineError;
use crate::domain::render::PaneRenderer;
use crate::domain::render::geometry::{centered_bar_geometry, media_to_bitmap_width};
use crate::ports::canvas_port::{RenderTarget, TextAlign, TextBaseline};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLineOptions {
    pub color: String,
    pub width: f64,
    pub title: Option<String>,
    pub font_size: f64,
}

impl Default for PriceLineOptions {
    fn default() -> Self {
        PriceLineOptions {
            color: "#f23645".to_string(),
            width: 1.0,
            title: None,
            font_size: 12.0,
        }
    }
}

#[derive(Default)]
pub struct PriceLineRenderer {
    price: Option<f64>,
    options: Option<PriceLineOptions>,
}

impl PriceLineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, price: f64, options: PriceLineOptions) {
        self.price = Some(price);
        self.options = Some(options);
    }
}

impl PaneRenderer for PriceLineRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let (Some(price), Some(options)) = (self.price, &self.options) else {
            return Ok(());
        };
        if target.space.visible_range().is_none() {
            return Ok(());
        }
        let Some(y) = target.space.price_to_coordinate(price) else {
            return Ok(());
        };

        let vpr = target.scope.vertical_pixel_ratio;
        let row = centered_bar_geometry(y, vpr, media_to_bitmap_width(options.width, vpr));
        target.context.set_fill_style(&options.color);
        target.context.fill_rect(
            0.0,
            row.position as f64,
            target.scope.bitmap_width,
            row.length as f64,
        );

        if let Some(title) = options.title.as_deref().filter(|t| !t.is_empty()) {
            let hpr = target.scope.horizontal_pixel_ratio;
            target
                .context
                .set_font(&format!("{}px sans-serif", options.font_size * vpr));
            target.context.set_text_align(TextAlign::Left);
            target.context.set_text_baseline(TextBaseline::Bottom);
            target
                .context
                .fill_text(title, 4.0 * hpr, row.position as f64 - 2.0 * vpr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::testing::{IdentitySpace, Op, draw_with};

    #[test]
    fn line_spans_pane_width() {
        let mut r = PriceLineRenderer::new();
        r.update(25.0, PriceLineOptions::default());
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert_eq!(ctx.rects(), vec![(0.0, 75.0, 100.0, 1.0)]);
    }

    #[test]
    fn title_sits_above_the_line() {
        let mut r = PriceLineRenderer::new();
        r.update(
            25.0,
            PriceLineOptions {
                title: Some("stop".to_string()),
                ..Default::default()
            },
        );
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert!(ctx.ops.contains(&Op::Text("stop".to_string(), 4.0, 73.0)));
    }

    #[test]
    fn hidden_pane_draws_nothing() {
        let mut r = PriceLineRenderer::new();
        r.update(25.0, PriceLineOptions::default());
        let space = IdentitySpace {
            range: None,
            ..Default::default()
        };
        let ctx = draw_with(&space, 1.0, |t| r.draw(t).unwrap());
        assert!(ctx.ops.is_empty());
    }
}
