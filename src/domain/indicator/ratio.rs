//! Pointwise ratio of a primary series over a secondary series.
//!
//! Each primary bar is paired with the secondary bar found by the alignment
//! index. Unless mismatched dates are allowed, the pair only counts when the
//! two times are equal.

use crate::domain::alignment::{AlignmentIndex, Direction};
use crate::domain::bar::{self, Bar, DerivedPoint, SourceField};
use crate::domain::error::PlotlineError;
use crate::domain::indicator::RatioOptions;

pub fn calculate_ratio(
    primary: &[Bar],
    secondary: &[Bar],
    options: &RatioOptions,
) -> Result<Vec<DerivedPoint>, PlotlineError> {
    bar::validate_times(primary)?;
    bar::validate_times(secondary)?;
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
    let points = primary
        .iter()
        .map(|bar| {
            let value = aligned_pair(
                bar,
                secondary,
                &mut index,
                primary_source,
                secondary_source,
                options.allow_mismatched_dates,
            )
            .map(|(p, s)| p / s)
            .filter(|v| v.is_finite());
            DerivedPoint::new(bar.time, value)
        })
        .collect();

    Ok(points)
}

/// The (primary, secondary) sample pair for `bar`, or `None` when the
/// secondary side is missing, non-numeric, or rejected for its time.
pub(crate) fn aligned_pair(
    bar: &Bar,
    secondary: &[Bar],
    index: &mut AlignmentIndex,
    primary_source: SourceField,
    secondary_source: Option<SourceField>,
    allow_mismatched_dates: bool,
) -> Option<(f64, f64)> {
    let matched = &secondary[index.find_closest_index(bar.time, Direction::Left)?];
    if !allow_mismatched_dates && matched.time != bar.time {
        return None;
    }
    Some((primary_source.read(bar)?, secondary_source?.read(matched)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(points: &[(f64, f64)]) -> Vec<Bar> {
        points.iter().map(|&(t, v)| Bar::single(t, v)).collect()
    }

    #[test]
    fn ratio_of_aligned_bars() {
        let primary = series(&[(1.0, 10.0), (2.0, 12.0), (3.0, 9.0)]);
        let secondary = series(&[(1.0, 5.0), (2.0, 4.0), (3.0, 3.0)]);
        let out = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap();
        let values: Vec<Option<f64>> = out.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(2.0), Some(3.0), Some(3.0)]);
    }

    #[test]
    fn mismatched_times_rejected_by_default() {
        let primary = series(&[(1.0, 10.0), (2.5, 12.0)]);
        let secondary = series(&[(1.0, 5.0), (2.0, 4.0), (3.0, 3.0)]);
        let out = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap();
        assert_eq!(out[0].value, Some(2.0));
        assert!(out[1].is_whitespace());
        assert_eq!(out[1].time, 2.5);
    }

    #[test]
    fn mismatched_times_use_upper_bracket_when_allowed() {
        let primary = series(&[(2.5, 12.0)]);
        let secondary = series(&[(1.0, 5.0), (2.0, 4.0), (3.0, 3.0)]);
        let options = RatioOptions {
            allow_mismatched_dates: true,
            ..Default::default()
        };
        let out = calculate_ratio(&primary, &secondary, &options).unwrap();
        assert_relative_eq!(out[0].value.unwrap(), 4.0);
    }

    #[test]
    fn independent_source_detection() {
        let primary = vec![Bar::ohlc(1.0, 0.0, 0.0, 0.0, 8.0)];
        let secondary = series(&[(1.0, 2.0)]);
        let out = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap();
        assert_eq!(out[0].value, Some(4.0));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        let primary = series(&[(1.0, 8.0)]);
        let secondary = series(&[(1.0, 0.0)]);
        let out = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap();
        assert!(out[0].is_whitespace());
    }

    #[test]
    fn empty_secondary_yields_whitespace() {
        let primary = series(&[(1.0, 8.0), (2.0, 9.0)]);
        let out = calculate_ratio(&primary, &[], &RatioOptions::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.is_whitespace()));
    }

    #[test]
    fn secondary_validated_for_numeric_time() {
        let primary = series(&[(1.0, 8.0)]);
        let secondary = series(&[(f64::NAN, 1.0)]);
        let err = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap_err();
        assert!(matches!(err, PlotlineError::Validation { .. }));
    }

    #[test]
    fn undetectable_secondary_source_fails() {
        let primary = series(&[(1.0, 8.0)]);
        let secondary = vec![Bar::whitespace(1.0)];
        let err = calculate_ratio(&primary, &secondary, &RatioOptions::default()).unwrap_err();
        assert!(matches!(err, PlotlineError::Configuration { .. }));
    }
}
