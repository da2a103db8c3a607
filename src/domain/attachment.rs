//! Indicator attachment: binds an [`IndicatorSpec`] to a host chart.
//!
//! On attach a derived line series is created on the host and the base
//! series is subscribed; every data change recomputes the indicator over
//! the full base snapshot and replaces the derived series wholesale.
//! Detach unsubscribes and removes the derived series.

use crate::domain::error::PlotlineError;
use crate::domain::indicator::{IndicatorSpec, OptionsPatch};
use crate::ports::chart_port::{
    ChartHost, DataChangedListener, DerivedSeries, SeriesSource, SubscriptionId,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

struct Subscribed {
    source: Rc<dyn SeriesSource>,
    subscription: SubscriptionId,
}

struct Attached {
    chart: Rc<dyn ChartHost>,
    base: Subscribed,
    secondary: Option<Subscribed>,
    derived: Rc<dyn DerivedSeries>,
}

struct AttachmentState {
    spec: IndicatorSpec,
    attached: Option<Attached>,
}

impl AttachmentState {
    fn recompute(&self) -> Result<(), PlotlineError> {
        let Some(attached) = &self.attached else {
            return Ok(());
        };

        let primary = attached.base.source.data();
        let secondary = attached.secondary.as_ref().map(|s| s.source.data());
        let points = self.spec.compute(&primary, secondary.as_deref())?;

        debug!(
            indicator = %self.spec,
            series = attached.derived.id(),
            points = points.len(),
            "recomputed indicator"
        );
        attached.derived.set_data(points);
        Ok(())
    }
}

/// Bound recompute callback handed to the host. Holds only a weak
/// back-reference so a dropped attachment never keeps itself alive.
struct Recompute {
    state: Weak<RefCell<AttachmentState>>,
}

impl DataChangedListener for Recompute {
    fn data_changed(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(state) = state.try_borrow() else {
            warn!("data change notification re-entered an indicator recompute");
            return;
        };
        if let Err(err) = state.recompute() {
            warn!(indicator = %state.spec, error = %err, "indicator recompute failed");
        }
    }
}

pub struct IndicatorAttachment {
    state: Rc<RefCell<AttachmentState>>,
}

impl IndicatorAttachment {
    pub fn new(spec: IndicatorSpec) -> Self {
        IndicatorAttachment {
            state: Rc::new(RefCell::new(AttachmentState {
                spec,
                attached: None,
            })),
        }
    }

    pub fn spec(&self) -> IndicatorSpec {
        self.state.borrow().spec.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached.is_some()
    }

    /// Attaches to `chart`, deriving from `base` (and `secondary` for
    /// dual-series indicators), and computes once immediately.
    ///
    /// If the first computation fails the attachment is rolled back and the
    /// error returned.
    pub fn attach(
        &self,
        chart: Rc<dyn ChartHost>,
        base: Rc<dyn SeriesSource>,
        secondary: Option<Rc<dyn SeriesSource>>,
    ) -> Result<(), PlotlineError> {
        if self.is_attached() {
            return Err(PlotlineError::illegal_state("indicator is already attached"));
        }

        let listener: Rc<dyn DataChangedListener> = Rc::new(Recompute {
            state: Rc::downgrade(&self.state),
        });
        let derived = chart.add_line_series();
        let subscribe = |source: Rc<dyn SeriesSource>| Subscribed {
            subscription: source.subscribe_data_changed(Rc::clone(&listener)),
            source,
        };
        let base = subscribe(base);
        let secondary = secondary.map(subscribe);

        debug!(series = derived.id(), "attached indicator");
        self.state.borrow_mut().attached = Some(Attached {
            chart,
            base,
            secondary,
            derived,
        });

        let result = self.state.borrow().recompute();
        if result.is_err() {
            self.detach();
        }
        result
    }

    /// Merges `patch` into the current options and recomputes. While
    /// detached only the options change. If the recompute fails the
    /// previous options are restored.
    pub fn apply_options(&self, patch: &OptionsPatch) -> Result<(), PlotlineError> {
        let previous = {
            let mut state = self.state.borrow_mut();
            let previous = state.spec.clone();
            state.spec.merge(patch);
            previous
        };
        let result = self.state.borrow().recompute();
        if result.is_err() {
            self.state.borrow_mut().spec = previous;
        }
        result
    }

    /// Unsubscribes from the sources and removes the derived series.
    /// Safe to call when already detached.
    pub fn detach(&self) {
        let Some(attached) = self.state.borrow_mut().attached.take() else {
            return;
        };

        attached
            .base
            .source
            .unsubscribe_data_changed(attached.base.subscription);
        if let Some(secondary) = &attached.secondary {
            secondary
                .source
                .unsubscribe_data_changed(secondary.subscription);
        }
        attached.chart.remove_series(&attached.derived);
        debug!(series = attached.derived.id(), "detached indicator");
    }

    pub fn indicator_series(&self) -> Result<Rc<dyn DerivedSeries>, PlotlineError> {
        self.state
            .borrow()
            .attached
            .as_ref()
            .map(|a| Rc::clone(&a.derived))
            .ok_or_else(|| PlotlineError::illegal_state("unable to provide indicator series"))
    }
}

impl Drop for IndicatorAttachment {
    fn drop(&mut self) {
        self.detach();
    }
}
