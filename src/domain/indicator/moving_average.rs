//! Moving average with an optional smoothing pass.
//!
//! The primary SMA is computed first; when smoothing is configured, the
//! selected moving average is run over the SMA output. The offset is applied
//! last.

use crate::domain::bar::{self, Bar, DerivedPoint, SourceField};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{SmoothedAverageOptions, require_length};
use crate::domain::offset::apply_offset;

pub fn calculate_moving_average(
    bars: &[Bar],
    options: &SmoothedAverageOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(bars)?;
    let length = require_length(options.window.length)?;
    let smoothing = options
        .smoothing
        .map(|s| require_length(s.length).map(|len| (s.method, len)))
        .transpose()?;
    if bars.is_empty() {
        return Ok(Vec::new());
    }

    let source = SourceField::resolve(options.window.source, bars)?;
    let mut values = sma_values(&bar::samples(bars, source), length);
    if let Some((method, smoothing_length)) = smoothing {
        values = method.apply(&values, smoothing_length);
    }

    Ok(apply_offset(bar::to_points(bars, values), options.window.offset))
}
