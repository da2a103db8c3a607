//! Rolling Pearson correlation between two aligned series.
//!
//! r = (n*Sxy - Sx*Sy) / sqrt((n*Sxx - Sx^2) * (n*Syy - Sy^2))
//! Clamped to [-1, 1]; zero variance on either side yields 0. Any missing
//! pair inside the window, or sums that overflow, leave the point undefined.

use crate::domain::alignment::AlignmentIndex;
use crate::domain::bar::{self, Bar, DerivedPoint, SourceField};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::ratio::aligned_pair;
use crate::domain::indicator::{CorrelationOptions, require_length};
use std::collections::VecDeque;

pub fn calculate_correlation(
    primary: &[Bar],
    secondary: &[Bar],
    options: &CorrelationOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(primary)?;
    bar::validate_times(secondary)?;
    let length = require_length(options.length)?;
    if primary.is_empty() {
        return Ok(Vec::new());
    }

    let primary_source = SourceField::resolve(options.primary_source, primary)?;
    let secondary_source = match options.secondary_source {
        Some(source) => Some(source),
        None if secondary.is_empty() => None,
        None => Some(SourceField::resolve(None, secondary)?),
    };

    let mut index = AlignmentIndex::new(secondary);
    let mut window: VecDeque<Option<(f64, f64)>> =
        VecDeque::with_capacity(length.min(primary.len()) + 1);

    let points = primary
        .iter()
        .map(|bar| {
            let pair = aligned_pair(
                bar,
                secondary,
                &mut index,
                primary_source,
                secondary_source,
                options.allow_mismatched_dates,
            );
            window.push_back(pair);
            if window.len() > length {
                window.pop_front();
            }

            let value = if window.len() == length {
                window
                    .iter()
                    .copied()
                    .collect::<Option<Vec<(f64, f64)>>>()
                    .and_then(|pairs| pearson(&pairs))
            } else {
                None
            };
            DerivedPoint::new(bar.time, value)
        })
        .collect();

    Ok(points)
}

pub(crate) fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
        syy += y * y;
    }

    let numerator = n * sxy - sx * sy;
    let variance_product = (n * sxx - sx * sx) * (n * syy - sy * sy);
    if !(numerator.is_finite() && variance_product.is_finite()) {
        return None;
    }
    if variance_product <= 0.0 {
        return Some(0.0);
    }

    Some((numerator / variance_product.sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: &[f64]) -> Vec<Bar> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::single(i as f64 * 60.0, v))
            .collect()
    }

    fn options(length: usize) -> CorrelationOptions {
        CorrelationOptions {
            length,
            ..Default::default()
        }
    }

    #[test]
    fn perfectly_correlated() {
        let primary = series(&[1.0, 2.0, 3.0, 4.0]);
        let secondary = series(&[2.0, 4.0, 6.0, 8.0]);
        let out = calculate_correlation(&primary, &secondary, &options(3)).unwrap();
        assert!(out[0].is_whitespace());
        assert!(out[1].is_whitespace());
        assert_relative_eq!(out[2].value.unwrap(), 1.0);
        assert_relative_eq!(out[3].value.unwrap(), 1.0);
    }

    #[test]
    fn perfectly_anti_correlated() {
        let primary = series(&[1.0, 2.0, 3.0]);
        let secondary = series(&[3.0, 2.0, 1.0]);
        let out = calculate_correlation(&primary, &secondary, &options(3)).unwrap();
        assert_relative_eq!(out[2].value.unwrap(), -1.0);
    }

    #[test]
    fn zero_variance_is_zero_not_nan() {
        let primary = series(&[5.0, 5.0, 5.0]);
        let secondary = series(&[1.0, 2.0, 3.0]);
        let out = calculate_correlation(&primary, &secondary, &options(3)).unwrap();
        assert_eq!(out[2].value, Some(0.0));
    }

    #[test]
    fn rounding_never_escapes_unit_interval() {
        let xs = [0.1, 0.2, 0.3, 0.7, 1.1];
        let pairs: Vec<(f64, f64)> = xs.iter().map(|&x| (x, x * 3.0 + 0.1)).collect();
        let r = pearson(&pairs).unwrap();
        assert!(r <= 1.0);
        assert_relative_eq!(r, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn identical_series_is_exactly_one() {
        let pairs: Vec<(f64, f64)> = [0.1, 0.2, 0.3, 0.4].iter().map(|&x| (x, x)).collect();
        assert_eq!(pearson(&pairs), Some(1.0));
    }

    #[test]
    fn precision_loss_stays_in_range() {
        // Large magnitudes make the sum formula lose most of its precision.
        let pairs: Vec<(f64, f64)> = (0..5)
            .map(|i| {
                let x = 1e8 + i as f64;
                (x, x)
            })
            .collect();
        let r = pearson(&pairs).unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn missing_pair_poisons_window() {
        let primary = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut secondary = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        secondary[1] = Bar::whitespace(60.0);
        let out = calculate_correlation(&primary, &secondary, &options(2)).unwrap();
        assert!(out[1].is_whitespace());
        assert!(out[2].is_whitespace());
        assert_relative_eq!(out[3].value.unwrap(), 1.0);
    }

    #[test]
    fn rejected_dates_count_as_missing() {
        let primary = vec![
            Bar::single(0.0, 1.0),
            Bar::single(60.0, 2.0),
            Bar::single(90.0, 3.0),
        ];
        let secondary = series(&[1.0, 2.0, 3.0]);
        let out = calculate_correlation(&primary, &secondary, &options(2)).unwrap();
        assert_relative_eq!(out[1].value.unwrap(), 1.0);
        assert!(out[2].is_whitespace());

        let allowed = CorrelationOptions {
            length: 2,
            allow_mismatched_dates: true,
            ..Default::default()
        };
        let out = calculate_correlation(&primary, &secondary, &allowed).unwrap();
        assert!(out[2].value.is_some());
    }

    #[test]
    fn overflowing_window_is_undefined_then_recovers() {
        let primary = series(&[1e200, 2e200, 1.0, 2.0, 3.0]);
        let secondary = series(&[1.0, 2.0, 1.0, 2.0, 3.0]);
        let out = calculate_correlation(&primary, &secondary, &options(2)).unwrap();
        assert_eq!(out[1].value, None);
        assert_relative_eq!(out[4].value.unwrap(), 1.0);
    }

    #[test]
    fn huge_length_is_all_undefined() {
        let primary = series(&[1.0, 2.0, 3.0]);
        let out =
            calculate_correlation(&primary, &primary, &options(i64::MAX as usize)).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn output_length_matches_primary() {
        let primary = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let secondary = series(&[2.0, 1.0]);
        let out = calculate_correlation(&primary, &secondary, &options(2)).unwrap();
        assert_eq!(out.len(), primary.len());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn correlation_stays_in_range(
                xs in proptest::collection::vec(-1e6f64..1e6, 2..30),
                ys in proptest::collection::vec(-1e6f64..1e6, 2..30),
            ) {
                let n = xs.len().min(ys.len());
                let pairs: Vec<(f64, f64)> = xs[..n].iter().copied().zip(ys[..n].iter().copied()).collect();
                let r = pearson(&pairs).unwrap();
                prop_assert!(r.is_finite());
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}
