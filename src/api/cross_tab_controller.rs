use tracing::debug;

use crate::core::{CrossTabInfo, Point, aggregate_cross_tab};
use crate::interaction::ControlSource;
use crate::render::{ChartSurface, ChartUpdate, SeriesUpdate};

use super::FilterEngine;
use super::filter_plan::FilterPlan;

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Builds the exact re-aggregation update for a chart backed by cross-tab rows.
    ///
    /// Always produces an update, even with no active filter, because the
    /// unfiltered aggregate is rendered through this path too.
    pub(super) fn cross_tab_update(
        &self,
        chart_id: &str,
        info: &CrossTabInfo,
        plan: &FilterPlan,
    ) -> Option<ChartUpdate> {
        let chart = self.surface.chart(chart_id)?;
        let aggregate = aggregate_cross_tab(info, &plan.selections());

        let by_name: Vec<Option<usize>> = aggregate
            .series
            .iter()
            .map(|series| chart.series_index(&series.name))
            .collect();

        let mut update = ChartUpdate {
            categories: Some(aggregate.categories),
            ..ChartUpdate::default()
        };
        for (position, series) in aggregate.series.into_iter().enumerate() {
            let index = by_name[position].or_else(|| {
                (position < chart.series.len() && !by_name.contains(&Some(position)))
                    .then_some(position)
            });
            let Some(index) = index else {
                debug!(
                    chart = chart_id,
                    stack = %series.name,
                    "no chart series for stack value; skipping"
                );
                continue;
            };
            update.series.push(SeriesUpdate {
                index,
                data: Some(series.data.into_iter().map(Point::Value).collect()),
                ..SeriesUpdate::default()
            });
        }
        Some(update)
    }
}
