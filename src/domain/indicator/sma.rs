//! Simple Moving Average.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n, kept as a running sum over a
//! sliding window. A non-numeric sample poisons every window it is part of.
//! The sum is rebuilt from the window whenever it overflows or when a value
//! leaving the window dwarfs what remains, so one extreme sample cannot
//! corrupt later windows.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::{WindowOptions, windowed};
use std::collections::VecDeque;

pub fn calculate_sma(
    bars: &[Bar],
    options: &WindowOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    windowed(bars, options, sma_values)
}

pub(crate) fn sma_values(samples: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(samples.len());
    let mut window: VecDeque<Option<f64>> =
        VecDeque::with_capacity(length.min(samples.len()) + 1);
    let mut sum = 0.0;
    let mut missing = 0usize;

    for &sample in samples {
        match sample {
            Some(v) => sum += v,
            None => missing += 1,
        }
        window.push_back(sample);

        if window.len() > length {
            match window.pop_front().flatten() {
                Some(v) => {
                    sum -= v;
                    if v.abs() > sum.abs() * RESUM_RATIO {
                        sum = window_sum(&window);
                    }
                }
                None => missing -= 1,
            }
        }
        if !sum.is_finite() {
            sum = window_sum(&window);
        }

        let value = if window.len() == length && missing == 0 {
            Some(sum / length as f64)
        } else {
            None
        };
        values.push(value);
    }

    values
}

/// How much larger a departing sample may be than the remaining sum before
/// the running sum is no longer trusted.
const RESUM_RATIO: f64 = 1e6;

fn window_sum(window: &VecDeque<Option<f64>>) -> f64 {
    window.iter().flatten().sum()
}
