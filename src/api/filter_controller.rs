use tracing::{debug, trace, warn};

use crate::core::narrowing::{
    narrow_by_period, narrow_by_selection, narrow_by_threshold, narrow_from_label, overlaps,
    points_at_or_after, reindex,
};
use crate::core::period::is_unbounded_period;
use crate::core::types::format_numeric;
use crate::core::{ChartSnapshot, PeriodPreset, Point, XyPoint};
use crate::extensions::FilterEvent;
use crate::interaction::ControlSource;
use crate::render::{ChartSurface, ChartUpdate, SeriesUpdate};

use super::FilterEngine;
use super::filter_plan::FilterPlan;

/// Per-series result of the visibility step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeriesVisibility {
    visible: bool,
    show_in_legend: bool,
}

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Recomputes every chart from its snapshot and the current control states.
    ///
    /// Before the surface is ready the pass is deferred and runs once
    /// readiness resolves. Returns the number of charts redrawn.
    pub fn apply_filters(&mut self) -> usize {
        if !self.scheduler.is_ready() {
            if self.surface.is_ready() {
                self.mark_surface_ready();
            } else {
                debug!("chart surface not ready; filter pass deferred");
                self.deferred_apply = true;
                return 0;
            }
        }
        self.deferred_apply = false;

        let plan = FilterPlan::from_registry(&self.registry, &self.config);
        trace!(?plan, "filter plan");

        let mut redrawn = 0;
        for chart_id in self.surface.chart_ids() {
            let update = if let Some(info) = self.tables.cross_tabs.get(&chart_id) {
                let update = self.cross_tab_update(&chart_id, info, &plan);
                self.emit_event(FilterEvent::CrossTabRebuilt {
                    chart_id: chart_id.clone(),
                });
                update
            } else {
                self.filtered_update(&chart_id, &plan)
            };
            let Some(update) = update else {
                continue;
            };
            match self.surface.apply_update(&chart_id, update) {
                Ok(()) => redrawn += 1,
                Err(err) => warn!(chart = %chart_id, error = %err, "chart update rejected"),
            }
        }

        self.passes += 1;
        debug!(charts = redrawn, pass = self.passes, "filters applied");
        self.emit_event(FilterEvent::FiltersApplied { charts: redrawn });
        redrawn
    }

    /// Re-runs the filter pass after the host re-rendered its charts.
    ///
    /// Snapshots of charts that no longer exist on the surface are dropped so
    /// a re-created chart is captured afresh.
    pub fn reapply(&mut self) -> usize {
        let live = self.surface.chart_ids();
        self.snapshots.retain(|id, _| live.contains(id));
        self.apply_filters()
    }

    fn capture_snapshot(&mut self, chart_id: &str) -> Option<ChartSnapshot> {
        if let Some(snapshot) = self.snapshots.get(chart_id) {
            return Some(snapshot.clone());
        }
        let snapshot = self.surface.chart(chart_id)?.snapshot();
        debug!(
            chart = chart_id,
            series = snapshot.series.len(),
            categories = snapshot.categories.as_ref().map_or(0, Vec::len),
            "captured chart snapshot"
        );
        self.snapshots.insert(chart_id.to_owned(), snapshot.clone());
        Some(snapshot)
    }

    fn filtered_update(&mut self, chart_id: &str, plan: &FilterPlan) -> Option<ChartUpdate> {
        let snapshot = self.capture_snapshot(chart_id)?;
        let categories = snapshot.categories.as_deref().unwrap_or_default();
        let indices = surviving_indices(categories, plan);

        let mut update = ChartUpdate::default();
        let base = match self.metric_data(&snapshot, plan) {
            Some((metric, data)) => {
                update.title = Some(metric.clone());
                update.y_axis_title = Some(metric);
                data
            }
            None => {
                update.title = snapshot.title.clone();
                update.y_axis_title = snapshot.y_axis_title.clone();
                snapshot
                    .series
                    .iter()
                    .map(|series| series.data.clone())
                    .collect()
            }
        };

        let threshold = plan.numeric_threshold();
        for (index, (series, data)) in snapshot.series.iter().zip(&base).enumerate() {
            let visibility = series_visibility(&series.name, &snapshot, plan);
            let data = if snapshot.has_categories() {
                reindex(data, &indices)
            } else if let Some(threshold) = threshold {
                points_at_or_after(data, threshold)
            } else {
                data.clone()
            };
            update.series.push(SeriesUpdate {
                index,
                data: Some(data),
                visible: Some(visibility.visible),
                show_in_legend: Some(visibility.show_in_legend),
            });
        }

        if snapshot.has_categories() {
            update.categories = Some(indices.iter().map(|&i| categories[i].clone()).collect());
        }
        Some(update)
    }

    /// Rebuilds series data for the selected metric from the time-series table.
    ///
    /// Returns data aligned with the snapshot's full axis so the category mask
    /// applies to it like to the original data.
    fn metric_data(
        &self,
        snapshot: &ChartSnapshot,
        plan: &FilterPlan,
    ) -> Option<(String, Vec<Vec<Point>>)> {
        let metric = plan.metric.as_ref()?;
        if self.time_series.is_empty() {
            return None;
        }
        if !self.time_series.has_metric(metric) {
            debug!(metric = %metric, "metric not present in time-series table");
            return None;
        }

        let data: Vec<Vec<Point>> = snapshot
            .series
            .iter()
            .map(|series| match &snapshot.categories {
                Some(categories) if !categories.is_empty() => categories
                    .iter()
                    .map(|time| {
                        Point::from_option(self.time_series.lookup(&series.name, metric, time))
                    })
                    .collect::<Vec<_>>(),
                _ => series
                    .data
                    .iter()
                    .filter_map(Point::x)
                    .map(|x| {
                        let time = format_numeric(x);
                        Point::Xy(XyPoint {
                            x,
                            y: self.time_series.lookup(&series.name, metric, &time),
                            name: None,
                        })
                    })
                    .collect::<Vec<_>>(),
            })
            .collect();
        Some((metric.clone(), data))
    }
}

/// Narrows the original category axis: period, then discrete, then sliders.
fn surviving_indices(categories: &[String], plan: &FilterPlan) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..categories.len()).collect();
    if categories.is_empty() {
        return indices;
    }

    if let Some(label) = plan.period.as_deref() {
        if !is_unbounded_period(label) {
            match PeriodPreset::parse(label) {
                Some(preset) => indices = narrow_by_period(categories, indices, preset),
                None => warn!(period = label, "unknown period preset; ignoring"),
            }
        }
    }

    for filter in &plan.discrete {
        if overlaps(&filter.values, categories.iter().map(String::as_str)) {
            indices = narrow_by_selection(categories, indices, &filter.values);
        }
    }

    for slider in &plan.sliders {
        indices = match slider.label.as_deref() {
            Some(label) => narrow_from_label(categories, indices, label),
            None => narrow_by_threshold(categories, indices, slider.value),
        };
    }
    indices
}

fn series_visibility(name: &str, snapshot: &ChartSnapshot, plan: &FilterPlan) -> SeriesVisibility {
    if plan.force_hidden.iter().any(|hidden| hidden == name) {
        return SeriesVisibility {
            visible: false,
            show_in_legend: false,
        };
    }
    if plan.force_shown.iter().any(|shown| shown == name) {
        return SeriesVisibility {
            visible: true,
            show_in_legend: true,
        };
    }

    let lowered = name.to_lowercase();
    let text_ok = plan
        .text_queries
        .iter()
        .filter(|query| {
            snapshot
                .series_names()
                .any(|candidate| candidate.to_lowercase().contains(query.as_str()))
        })
        .all(|query| lowered.contains(query.as_str()));

    let discrete_ok = plan
        .discrete
        .iter()
        .filter(|filter| overlaps(&filter.values, snapshot.series_names()))
        .all(|filter| filter.values.iter().any(|value| value == name));

    SeriesVisibility {
        visible: text_ok && discrete_ok,
        show_in_legend: true,
    }
}
