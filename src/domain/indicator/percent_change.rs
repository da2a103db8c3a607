//! Percent change of the close between consecutive bars.
//!
//! PCT[i] = (C[i] - C[i-1]) * 100 / C[i-1]
//! Index 0, non-OHLC bars and a zero previous close are undefined.

use crate::domain::bar::{Bar, DerivedPoint, numeric};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::OffsetOptions;
use crate::domain::{bar, offset::apply_offset};

pub fn calculate_percent_change(
    bars: &[Bar],
    options: &OffsetOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(bars)?;

    let points = bars
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let value = i
                .checked_sub(1)
                .and_then(|prev| {
                    let prev_close = numeric(bars[prev].close)?;
                    let close = numeric(current.close)?;
                    Some((close - prev_close) * 100.0 / prev_close)
                })
                .filter(|v| v.is_finite());
            DerivedPoint::new(current.time, value)
        })
        .collect();

    Ok(apply_offset(points, options.offset))
}
