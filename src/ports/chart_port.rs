//! Host chart collaborator traits.
//!
//! The host is single-threaded: notifications are dispatched synchronously
//! on the caller's thread, so every method takes `&self` and implementations
//! use interior mutability.

use crate::domain::bar::{Bar, DerivedPoint};
use std::rc::Rc;

pub type SubscriptionId = u64;
pub type SeriesId = u64;

/// Receives data-change notifications from a [`SeriesSource`].
pub trait DataChangedListener {
    fn data_changed(&self);
}

/// A series whose data the core reads but never mutates.
pub trait SeriesSource {
    /// Current full snapshot, in chronological order.
    fn data(&self) -> Vec<Bar>;
    fn subscribe_data_changed(&self, listener: Rc<dyn DataChangedListener>) -> SubscriptionId;
    fn unsubscribe_data_changed(&self, id: SubscriptionId);
}

/// A series created on the host and owned by whoever added it.
pub trait DerivedSeries {
    fn id(&self) -> SeriesId;
    /// Replaces the whole series.
    fn set_data(&self, points: Vec<DerivedPoint>);
    fn data(&self) -> Vec<DerivedPoint>;
}

pub trait ChartHost {
    /// Adds an empty line series to the chart.
    fn add_line_series(&self) -> Rc<dyn DerivedSeries>;
    fn remove_series(&self, series: &Rc<dyn DerivedSeries>);
}
