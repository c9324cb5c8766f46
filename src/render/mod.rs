mod chart;
mod in_memory_surface;

pub use chart::{ChartUpdate, LiveChart, LiveSeries, SeriesUpdate};
pub use in_memory_surface::InMemorySurface;

use crate::error::FilterResult;

/// Contract implemented by the charting library binding.
///
/// The engine reads live charts through it and pushes one batched
/// `ChartUpdate` per chart per filter pass; each `apply_update` call is one
/// redraw.
pub trait ChartSurface {
    /// False while the charting library is still constructing chart objects.
    fn is_ready(&self) -> bool;
    fn chart_ids(&self) -> Vec<String>;
    fn chart(&self, id: &str) -> Option<&LiveChart>;
    fn apply_update(&mut self, id: &str, update: ChartUpdate) -> FilterResult<()>;
}
