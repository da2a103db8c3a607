//! Polyline through a derived series; undefined points break the line.

use crate::domain::bar::DerivedPoint;
use crate::domain::error::PlotlineError;
use crate::domain::render::{PaneRenderer, visible_slice};
use crate::ports::canvas_port::RenderTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct LineOptions {
    pub color: String,
    pub line_width: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        LineOptions {
            color: "#2962ff".to_string(),
            line_width: 2.0,
        }
    }
}

#[derive(Default)]
pub struct LineRenderer {
    data: Vec<DerivedPoint>,
    options: Option<LineOptions>,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: Vec<DerivedPoint>, options: LineOptions) {
        self.data = data;
        self.options = Some(options);
    }
}

impl PaneRenderer for LineRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let Some(range) = target.space.visible_range() else {
            return Ok(());
        };
        let visible = visible_slice(&self.data, range, |p| p.time);
        if visible.iter().all(DerivedPoint::is_whitespace) {
            return Ok(());
        }

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        target.context.set_stroke_style(&options.color);
        target.context.set_line_width(options.line_width * hpr);
        target.context.begin_path();

        let mut pen_down = false;
        for point in visible {
            let xy = point.value.and_then(|v| {
                Some((
                    target.space.time_to_coordinate(point.time)? * hpr,
                    target.space.price_to_coordinate(v)? * vpr,
                ))
            });
            match xy {
                Some((x, y)) if pen_down => target.context.line_to(x, y),
                Some((x, y)) => {
                    target.context.move_to(x, y);
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
        target.context.stroke();
        Ok(())
    }
}
