//! Grouped bars: several values per time drawn side by side, each from a
//! shared baseline.

use crate::domain::error::PlotlineError;
use crate::domain::render::geometry::span_geometry;
use crate::domain::render::{PaneRenderer, visible_slice};
use crate::ports::canvas_port::RenderTarget;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarsPoint {
    pub time: f64,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarsOptions {
    /// Cycled when there are more values than colours.
    pub colors: Vec<String>,
    pub baseline: f64,
    /// Share of the bar spacing the whole group may occupy.
    pub fill_ratio: f64,
}

impl Default for GroupedBarsOptions {
    fn default() -> Self {
        GroupedBarsOptions {
            colors: vec![
                "#2962ff".to_string(),
                "#e1575a".to_string(),
                "#ee7d21".to_string(),
            ],
            baseline: 0.0,
            fill_ratio: 0.8,
        }
    }
}

#[derive(Default)]
pub struct GroupedBarsRenderer {
    data: Vec<GroupedBarsPoint>,
    options: Option<GroupedBarsOptions>,
}

impl GroupedBarsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: Vec<GroupedBarsPoint>, options: GroupedBarsOptions) {
        self.data = data;
        self.options = Some(options);
    }
}

impl PaneRenderer for GroupedBarsRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let Some(range) = target.space.visible_range() else {
            return Ok(());
        };
        if options.colors.is_empty() {
            return Ok(());
        }
        let Some(base_y) = target.space.price_to_coordinate(options.baseline) else {
            return Ok(());
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        let group_width = (target.space.bar_spacing() * hpr * options.fill_ratio).floor();

        for point in visible_slice(&self.data, range, |p| p.time) {
            let count = point.values.len();
            if count == 0 {
                continue;
            }
            let Some(x) = target.space.time_to_coordinate(point.time) else {
                continue;
            };
            let bar_width = (group_width / count as f64).floor().max(1.0);
            let left = (x * hpr).round() - (bar_width * count as f64 / 2.0).floor();

            for (j, value) in point.values.iter().enumerate() {
                let Some(y) = value.and_then(|v| target.space.price_to_coordinate(v)) else {
                    continue;
                };
                let span = span_geometry(base_y, y, vpr);
                target
                    .context
                    .set_fill_style(&options.colors[j % options.colors.len()]);
                target.context.fill_rect(
                    left + j as f64 * bar_width,
                    span.position as f64,
                    bar_width,
                    span.length as f64,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::render::testing::{IdentitySpace, Op, draw_with};

    #[test]
    fn bars_sit_side_by_side_around_the_time() {
        let mut r = GroupedBarsRenderer::new();
        r.update(
            vec![GroupedBarsPoint {
                time: 50.0,
                values: vec![Some(10.0), Some(20.0)],
            }],
            GroupedBarsOptions::default(),
        );
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());

        // spacing 10 * 0.8 = 8 -> two 4px bars starting at 46
        assert_eq!(
            ctx.rects(),
            vec![(46.0, 90.0, 4.0, 11.0), (50.0, 80.0, 4.0, 21.0)]
        );
        assert!(ctx.ops.contains(&Op::Fill("#e1575a".to_string())));
    }

    #[test]
    fn missing_values_leave_gaps() {
        let mut r = GroupedBarsRenderer::new();
        r.update(
            vec![GroupedBarsPoint {
                time: 50.0,
                values: vec![None, Some(20.0)],
            }],
            GroupedBarsOptions::default(),
        );
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert_eq!(ctx.rects(), vec![(50.0, 80.0, 4.0, 21.0)]);
    }

    #[test]
    fn colours_cycle() {
        let mut r = GroupedBarsRenderer::new();
        r.update(
            vec![GroupedBarsPoint {
                time: 50.0,
                values: vec![Some(1.0); 3],
            }],
            GroupedBarsOptions {
                colors: vec!["red".to_string()],
                ..Default::default()
            },
        );
        let ctx = draw_with(&IdentitySpace::default(), 1.0, |t| r.draw(t).unwrap());
        assert_eq!(ctx.count(|op| *op == Op::Fill("red".to_string())), 3);
    }
}
