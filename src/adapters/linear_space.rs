//! Linear coordinate space: maps a time range across the pane width and a
//! price range up the pane height.

use crate::ports::canvas_port::CoordinateSpace;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearCoordinateSpace {
    time_range: (f64, f64),
    price_range: (f64, f64),
    width: f64,
    height: f64,
    bar_spacing: f64,
    /// Media pixels kept clear on every side.
    margin: f64,
}

impl LinearCoordinateSpace {
    pub fn new(
        time_range: (f64, f64),
        price_range: (f64, f64),
        width: f64,
        height: f64,
        bar_spacing: f64,
    ) -> Self {
        LinearCoordinateSpace {
            time_range,
            price_range,
            width,
            height,
            bar_spacing,
            margin: 0.0,
        }
    }

    /// A space covering every finite time and price given, with `margin`
    /// media pixels of padding. `None` when there is nothing to place.
    pub fn fit(
        times: &[f64],
        prices: impl IntoIterator<Item = f64>,
        width: f64,
        height: f64,
        margin: f64,
    ) -> Option<Self> {
        let (t_min, t_max) = bounds(times.iter().copied())?;
        let (p_min, p_max) = bounds(prices)?;
        let plot_width = (width - 2.0 * margin).max(1.0);
        let bar_spacing = plot_width / times.len().max(1) as f64;
        Some(LinearCoordinateSpace {
            time_range: (t_min, t_max),
            price_range: (p_min, p_max),
            width,
            height,
            bar_spacing,
            margin,
        })
    }

    fn scale(value: f64, (lo, hi): (f64, f64), extent: f64) -> f64 {
        if hi > lo {
            (value - lo) / (hi - lo) * extent
        } else {
            extent / 2.0
        }
    }
}

fn bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

impl CoordinateSpace for LinearCoordinateSpace {
    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        if !price.is_finite() {
            return None;
        }
        let extent = self.height - 2.0 * self.margin;
        Some(self.height - self.margin - Self::scale(price, self.price_range, extent))
    }

    fn time_to_coordinate(&self, time: f64) -> Option<f64> {
        if !time.is_finite() {
            return None;
        }
        let extent = self.width - 2.0 * self.margin;
        Some(self.margin + Self::scale(time, self.time_range, extent))
    }

    fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    fn visible_range(&self) -> Option<(f64, f64)> {
        let (from, to) = self.time_range;
        (from <= to).then_some(self.time_range)
    }

    fn pane_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}
