//! Signed offset applied to a computed series.
//!
//! Values move along the time axis while times stay put, so the output is
//! always the same length as the input. A positive offset moves values to
//! later bars and blanks the first `offset` points; a negative offset moves
//! them to earlier bars and blanks the tail.

use crate::domain::bar::DerivedPoint;

pub fn apply_offset(points: Vec<DerivedPoint>, offset: i64) -> Vec<DerivedPoint> {
    if offset == 0 || points.is_empty() {
        return points;
    }

    let len = points.len();
    let shift = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX);

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let from = if offset > 0 {
                i.checked_sub(shift)
            } else {
                i.checked_add(shift).filter(|&j| j < len)
            };
            DerivedPoint::new(point.time, from.and_then(|j| points[j].value))
        })
        .collect()
}
