//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first numeric sample,
//! then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are undefined even though a raw EMA exists.
//! A non-numeric sample is undefined at its own position but leaves the
//! running EMA untouched; only finite values are ever committed to it.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{WindowOptions, windowed};

pub fn calculate_ema(
    bars: &[Bar],
    options: &WindowOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    windowed(bars, options, ema_values)
}

pub(crate) fn ema_values(samples: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    let k = 2.0 / (length as f64 + 1.0);
    let warmup = length.saturating_sub(1);
    let mut ema: Option<f64> = None;

    samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let current = sample.map(|p| match ema {
                Some(prev) => p * k + prev * (1.0 - k),
                None => p,
            });
            let current = current.filter(|v| v.is_finite());
            if current.is_some() {
                ema = current;
            }
            if i < warmup { None } else { current }
        })
        .collect()
}
