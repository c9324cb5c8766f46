use indexmap::IndexMap;

use crate::core::{ChartSnapshot, ControlState, DataTables, TimeSeriesIndex};
use crate::error::FilterResult;
use crate::extensions::FilterPlugin;
use crate::interaction::{ControlSource, FilterScheduler, Readiness};
use crate::render::ChartSurface;

use super::FilterEngineConfig;

/// Filter engine for one dashboard page.
///
/// Owns the control registry, default snapshot and per-chart snapshot cache,
/// and drives the chart surface through batched updates.
pub struct FilterEngine<S: ChartSurface, C: ControlSource> {
    pub(super) surface: S,
    pub(super) controls: C,
    pub(super) config: FilterEngineConfig,
    pub(super) registry: IndexMap<String, ControlState>,
    pub(super) defaults: IndexMap<String, ControlState>,
    pub(super) snapshots: IndexMap<String, ChartSnapshot>,
    pub(super) tables: DataTables,
    pub(super) time_series: TimeSeriesIndex,
    pub(super) scheduler: FilterScheduler,
    pub(super) deferred_apply: bool,
    pub(super) passes: u64,
    pub(super) plugins: Vec<Box<dyn FilterPlugin>>,
}

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    pub fn new(surface: S, controls: C, config: FilterEngineConfig) -> FilterResult<Self> {
        config.validate()?;
        let scheduler = config.scheduler();
        Ok(Self {
            surface,
            controls,
            config,
            registry: IndexMap::new(),
            defaults: IndexMap::new(),
            snapshots: IndexMap::new(),
            tables: DataTables::default(),
            time_series: TimeSeriesIndex::default(),
            scheduler,
            deferred_apply: false,
            passes: 0,
            plugins: Vec::new(),
        })
    }

    /// Installs the page's global data tables.
    #[must_use]
    pub fn with_data_tables(mut self, tables: DataTables) -> Self {
        self.set_data_tables(tables);
        self
    }

    pub fn set_data_tables(&mut self, tables: DataTables) {
        self.time_series = TimeSeriesIndex::build(&tables.time_series);
        self.tables = tables;
    }

    #[must_use]
    pub fn config(&self) -> &FilterEngineConfig {
        &self.config
    }

    /// Current control states in discovery order.
    #[must_use]
    pub fn state(&self) -> &IndexMap<String, ControlState> {
        &self.registry
    }

    /// Control states as captured at initialization.
    #[must_use]
    pub fn defaults(&self) -> &IndexMap<String, ControlState> {
        &self.defaults
    }

    #[must_use]
    pub fn control(&self, id: &str) -> Option<&ControlState> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn chart_snapshot(&self, chart_id: &str) -> Option<&ChartSnapshot> {
        self.snapshots.get(chart_id)
    }

    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.scheduler.readiness()
    }

    /// Number of completed filter passes.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn controls(&self) -> &C {
        &self.controls
    }

    /// Mutable access to the DOM side, used by hosts to mirror user input
    /// before calling `on_control_changed`.
    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    #[must_use]
    pub fn into_parts(self) -> (S, C) {
        (self.surface, self.controls)
    }
}
