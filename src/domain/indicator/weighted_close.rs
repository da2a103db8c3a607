//! Weighted close price.
//!
//! WCLOSE[i] = (C[i]*w + H[i] + L[i]) / (2 + w), default w = 2.
//! Bars without high, low and close yield a whitespace point.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{WeightedCloseOptions, per_bar};

pub fn calculate_weighted_close(
    bars: &[Bar],
    options: &WeightedCloseOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    let weight = options.weight;
    per_bar(bars, options.offset, |bar| {
        let (high, low, close) = bar.hlc()?;
        Some((close * weight + high + low) / (2.0 + weight))
    })
}
