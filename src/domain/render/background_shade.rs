//! Background shading: fills each bar's full-height column with a colour
//! blended between two stops according to the bar's value.

use crate::domain::bar::DerivedPoint;
use crate::domain::error::PlotlineError;
use crate::domain::render::color::Rgba;
use crate::domain::render::geometry::{centered_bar_geometry, media_to_bitmap_width};
use crate::domain::render::{PaneRenderer, visible_slice};
use crate::ports::canvas_port::RenderTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundShadeOptions {
    pub low_value: f64,
    pub high_value: f64,
    pub low_color: String,
    pub high_color: String,
}

impl Default for BackgroundShadeOptions {
    fn default() -> Self {
        BackgroundShadeOptions {
            low_value: 0.0,
            high_value: 100.0,
            low_color: "rgba(242, 54, 69, 0.2)".to_string(),
            high_color: "rgba(8, 153, 129, 0.2)".to_string(),
        }
    }
}

struct Stops {
    low_value: f64,
    high_value: f64,
    low: Rgba,
    high: Rgba,
}

impl Stops {
    fn color_for(&self, value: f64) -> Rgba {
        let span = self.high_value - self.low_value;
        let t = if span == 0.0 {
            0.0
        } else {
            (value - self.low_value) / span
        };
        self.low.mix(&self.high, t)
    }
}

#[derive(Default)]
pub struct BackgroundShadeRenderer {
    data: Vec<DerivedPoint>,
    stops: Option<Stops>,
}

impl BackgroundShadeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails on unparseable colours, leaving the previous state in place.
    pub fn update(
        &mut self,
        data: Vec<DerivedPoint>,
        options: &BackgroundShadeOptions,
    ) -> Result<(), PlotlineError> {
        let stops = Stops {
            low_value: options.low_value,
            high_value: options.high_value,
            low: Rgba::parse(&options.low_color)?,
            high: Rgba::parse(&options.high_color)?,
        };
        self.data = data;
        self.stops = Some(stops);
        Ok(())
    }
}

impl PaneRenderer for BackgroundShadeRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(stops) = &self.stops else {
            return Ok(());
        };
        let Some(range) = target.space.visible_range() else {
            return Ok(());
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let width = media_to_bitmap_width(target.space.bar_spacing(), hpr);
        let height = target.scope.bitmap_height;

        for point in visible_slice(&self.data, range, |p| p.time) {
            let Some(value) = point.value else { continue };
            let Some(x) = target.space.time_to_coordinate(point.time) else {
                continue;
            };
            let column = centered_bar_geometry(x, hpr, width);
            target
                .context
                .set_fill_style(&stops.color_for(value).to_css());
            target
                .context
                .fill_rect(column.position as f64, 0.0, column.length as f64, height);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::testing::{IdentitySpace, Op, draw_with};

    fn options() -> BackgroundShadeOptions {
        BackgroundShadeOptions {
            low_value: 0.0,
            high_value: 10.0,
            low_color: "#000000".to_string(),
            high_color: "#ffffff".to_string(),
        }
    }

    #[test]
    fn columns_span_full_height_with_blended_colour() {
        let mut r = BackgroundShadeRenderer::new();
        r.update(
            vec![DerivedPoint::new(20.0, Some(0.0)), DerivedPoint::new(40.0, Some(10.0))],
            &options(),
        )
        .unwrap();
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());

        assert_eq!(ctx.rects(), vec![(15.0, 0.0, 10.0, 100.0), (35.0, 0.0, 10.0, 100.0)]);
        assert!(ctx.ops.contains(&Op::Fill("rgba(0, 0, 0, 1)".to_string())));
        assert!(ctx.ops.contains(&Op::Fill("rgba(255, 255, 255, 1)".to_string())));
    }

    #[test]
    fn values_beyond_stops_clamp() {
        let mut r = BackgroundShadeRenderer::new();
        r.update(vec![DerivedPoint::new(20.0, Some(50.0))], &options())
            .unwrap();
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert!(ctx.ops.contains(&Op::Fill("rgba(255, 255, 255, 1)".to_string())));
    }

    #[test]
    fn bad_colour_is_rejected_and_state_kept() {
        let mut r = BackgroundShadeRenderer::new();
        let bad = BackgroundShadeOptions {
            low_color: "nope".to_string(),
            ..options()
        };
        assert!(r.update(vec![DerivedPoint::new(1.0, Some(1.0))], &bad).is_err());
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert!(ctx.ops.is_empty());
    }
}
