use crate::extensions::{FilterContext, FilterEvent};
use crate::interaction::ControlSource;
use crate::render::ChartSurface;

use super::FilterEngine;

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    pub(super) fn plugin_context(&self) -> FilterContext {
        FilterContext {
            controls_len: self.registry.len(),
            snapshots_len: self.snapshots.len(),
            readiness: self.scheduler.readiness(),
            passes: self.passes,
        }
    }

    pub(super) fn emit_event(&mut self, event: FilterEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(&event, context);
        }
    }
}
