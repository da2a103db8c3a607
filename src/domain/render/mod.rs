//! Custom renderers: turn already-computed values into drawing calls.
//!
//! Renderers never compute derived data. Each holds the data and options
//! last passed to `update` and paints them on `draw`. Missing data, options
//! or visible range means nothing is drawn at all.

pub mod anchored_text;
pub mod background_shade;
pub mod color;
pub mod geometry;
pub mod grouped_bars;
pub mod hlc_area;
pub mod line;
pub mod lollipop;
pub mod price_line;
pub mod price_scale_labels;
pub mod vertical_line;
pub mod watermark;

#[cfg(test)]
pub(crate) mod testing;

use crate::domain::error::PlotlineError;
use crate::ports::canvas_port::RenderTarget;

pub trait PaneRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError>;
}

/// The slice of time-sorted `items` whose time lies in `range`.
pub(crate) fn visible_slice<T>(
    items: &[T],
    range: (f64, f64),
    time: impl Fn(&T) -> f64,
) -> &[T] {
    let (from, to) = range;
    let start = items.partition_point(|item| time(item) < from);
    let end = items.partition_point(|item| time(item) <= to);
    if start >= end { &[] } else { &items[start..end] }
}
