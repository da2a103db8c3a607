//! Momentum indicator.
//!
//! MOM(n)[i] = P[i] - P[i-n]
//! Warmup: first n bars undefined.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{WindowOptions, windowed};

pub fn calculate_momentum(
    bars: &[Bar],
    options: &WindowOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    windowed(bars, options, momentum_values)
}

fn momentum_values(samples: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    (0..samples.len())
        .map(|i| {
            let prev = samples[i.checked_sub(length)?]?;
            Some(samples[i]? - prev)
        })
        .collect()
}
