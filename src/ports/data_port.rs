//! Bar data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::PlotlineError;

pub trait DataPort {
    /// Bars of the named series in chronological order.
    fn fetch_series(&self, name: &str) -> Result<Vec<Bar>, PlotlineError>;
}
