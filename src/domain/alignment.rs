//! Nearest-by-time lookup over a secondary series.
//!
//! Built once per secondary series snapshot and discarded after the
//! transform that built it. Resolved indices are memoized per
//! `(time, direction)` for the life of the index.

use crate::domain::bar::Bar;
use std::collections::HashMap;
use tracing::trace;

/// Which bracketing index to return when the query time falls strictly
/// between two samples.
///
/// `Left` yields the upper bracket (first sample at or after the query),
/// `Right` the lower one (last sample at or before). Exact matches and the
/// out-of-range clamps ignore the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ProbeKey {
    time_bits: u64,
    direction: Direction,
}

impl ProbeKey {
    fn new(time: f64, direction: Direction) -> Self {
        // -0.0 and 0.0 must share a slot.
        let time = if time == 0.0 { 0.0 } else { time };
        ProbeKey {
            time_bits: time.to_bits(),
            direction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentIndex {
    times: Vec<f64>,
    memo: HashMap<ProbeKey, usize>,
}

impl AlignmentIndex {
    pub fn new(bars: &[Bar]) -> Self {
        AlignmentIndex {
            times: bars.iter().map(|b| b.time).collect(),
            memo: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of the sample closest to `time`, or `None` for an empty series.
    pub fn find_closest_index(&mut self, time: f64, direction: Direction) -> Option<usize> {
        let last = self.times.len().checked_sub(1)?;

        let key = ProbeKey::new(time, direction);
        if let Some(&index) = self.memo.get(&key) {
            trace!(time, ?direction, index, "alignment cache hit");
            return Some(index);
        }

        let index = if time <= self.times[0] {
            0
        } else if time >= self.times[last] {
            last
        } else {
            self.search(time, direction)
        };

        self.memo.insert(key, index);
        Some(index)
    }

    fn search(&self, time: f64, direction: Direction) -> usize {
        // Callers guarantee times[0] < time < times[last], so hi never
        // underflows and lo never passes the end.
        let mut lo = 0usize;
        let mut hi = self.times.len() - 1;

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let probe = self.times[mid];
            if probe == time {
                return mid;
            }
            if probe < time {
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }

        match direction {
            Direction::Left => lo,
            Direction::Right => hi,
        }
    }

    pub fn cached_queries(&self) -> usize {
        self.memo.len()
    }
}
