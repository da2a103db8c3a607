//! Weighted Moving Average.
//!
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Every sample in the window must be numeric.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{WindowOptions, windowed};

pub fn calculate_wma(
    bars: &[Bar],
    options: &WindowOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    windowed(bars, options, wma_values)
}

pub(crate) fn wma_values(samples: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    let divisor = length as f64 * (length as f64 + 1.0) / 2.0;

    (0..samples.len())
        .map(|i| {
            if i + 1 < length {
                return None;
            }
            let window = &samples[i + 1 - length..=i];
            window
                .iter()
                .enumerate()
                .try_fold(0.0, |acc, (j, sample)| {
                    sample.map(|p| acc + (j + 1) as f64 * p)
                })
                .map(|weighted| weighted / divisor)
        })
        .collect()
}
