//! Median price: (H + L) / 2.

use crate::domain::bar::{Bar, DerivedPoint, numeric};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{OffsetOptions, per_bar};

pub fn calculate_median_price(
    bars: &[Bar],
    options: &OffsetOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    per_bar(bars, options.offset, |bar| {
        Some((numeric(bar.high)? + numeric(bar.low)?) / 2.0)
    })
}
