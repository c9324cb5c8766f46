use indexmap::IndexMap;
use tracing::trace;

use crate::error::{FilterError, FilterResult};
use crate::render::{ChartSurface, ChartUpdate, LiveChart};

/// Headless chart surface used by tests and hosts without a chart library.
///
/// It applies updates exactly like a real surface would and counts redraws
/// per chart so callers can verify batching.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    charts: IndexMap<String, LiveChart>,
    redraws: IndexMap<String, usize>,
    ready: bool,
}

impl InMemorySurface {
    /// Creates a surface that reports itself ready immediately.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Creates a surface still constructing its charts.
    #[must_use]
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn insert_chart(&mut self, chart: LiveChart) {
        self.charts.insert(chart.id.clone(), chart);
    }

    /// Drops a chart, as when a tab panel is torn down.
    pub fn remove_chart(&mut self, id: &str) -> Option<LiveChart> {
        self.charts.shift_remove(id)
    }

    #[must_use]
    pub fn with_chart(mut self, chart: LiveChart) -> Self {
        self.insert_chart(chart);
        self
    }

    #[must_use]
    pub fn redraw_count(&self, id: &str) -> usize {
        self.redraws.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_redraws(&self) -> usize {
        self.redraws.values().sum()
    }
}

impl ChartSurface for InMemorySurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn chart_ids(&self) -> Vec<String> {
        self.charts.keys().cloned().collect()
    }

    fn chart(&self, id: &str) -> Option<&LiveChart> {
        self.charts.get(id)
    }

    fn apply_update(&mut self, id: &str, update: ChartUpdate) -> FilterResult<()> {
        let chart = self
            .charts
            .get_mut(id)
            .ok_or_else(|| FilterError::UnknownChart(id.to_owned()))?;
        chart.apply(update)?;
        *self.redraws.entry(id.to_owned()).or_insert(0) += 1;
        trace!(chart = id, "redraw");
        Ok(())
    }
}
