//! In-memory chart host.
//!
//! Dispatches data-change notifications synchronously, after releasing its
//! own borrows, so listeners may read the series they were notified by.

use crate::domain::bar::{Bar, DerivedPoint};
use crate::ports::chart_port::{
    ChartHost, DataChangedListener, DerivedSeries, SeriesId, SeriesSource,
    SubscriptionId,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
pub struct MemorySeries {
    bars: RefCell<Vec<Bar>>,
    listeners: RefCell<Vec<(SubscriptionId, Rc<dyn DataChangedListener>)>>,
    next_subscription: Cell<SubscriptionId>,
}

impl MemorySeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        MemorySeries {
            bars: RefCell::new(bars),
            ..Default::default()
        }
    }

    /// Replaces the data and notifies every subscriber.
    pub fn set_data(&self, bars: Vec<Bar>) {
        *self.bars.borrow_mut() = bars;
        self.notify();
    }

    /// Appends one bar, or replaces the last one when the times match.
    pub fn update(&self, bar: Bar) {
        {
            let mut bars = self.bars.borrow_mut();
            match bars.last_mut() {
                Some(last) if last.time == bar.time => *last = bar,
                _ => bars.push(bar),
            }
        }
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        let listeners: Vec<Rc<dyn DataChangedListener>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener.data_changed();
        }
    }
}

impl SeriesSource for MemorySeries {
    fn data(&self) -> Vec<Bar> {
        self.bars.borrow().clone()
    }

    fn subscribe_data_changed(&self, listener: Rc<dyn DataChangedListener>) -> SubscriptionId {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe_data_changed(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sid, _)| *sid != id);
    }
}

pub struct MemoryDerivedSeries {
    id: SeriesId,
    points: RefCell<Vec<DerivedPoint>>,
}

impl DerivedSeries for MemoryDerivedSeries {
    fn id(&self) -> SeriesId {
        self.id
    }

    fn set_data(&self, points: Vec<DerivedPoint>) {
        *self.points.borrow_mut() = points;
    }

    fn data(&self) -> Vec<DerivedPoint> {
        self.points.borrow().clone()
    }
}

#[derive(Default)]
pub struct MemoryChart {
    series: RefCell<Vec<Rc<dyn DerivedSeries>>>,
    next_id: Cell<SeriesId>,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series_count(&self) -> usize {
        self.series.borrow().len()
    }

    pub fn series(&self) -> Vec<Rc<dyn DerivedSeries>> {
        self.series.borrow().clone()
    }
}

impl ChartHost for MemoryChart {
    fn add_line_series(&self) -> Rc<dyn DerivedSeries> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let series: Rc<dyn DerivedSeries> = Rc::new(MemoryDerivedSeries {
            id,
            points: RefCell::new(Vec::new()),
        });
        self.series.borrow_mut().push(Rc::clone(&series));
        series
    }

    fn remove_series(&self, series: &Rc<dyn DerivedSeries>) {
        let id = series.id();
        self.series.borrow_mut().retain(|s| s.id() != id);
    }
}
