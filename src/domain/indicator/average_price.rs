//! Average price: (O + H + L + C) / 4.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{OffsetOptions, per_bar};

pub fn calculate_average_price(
    bars: &[Bar],
    options: &OffsetOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    per_bar(bars, options.offset, |bar| {
        let (open, high, low, close) = bar.ohlc_values()?;
        Some((open + high + low + close) / 4.0)
    })
}
