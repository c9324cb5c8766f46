use std::time::Duration;

use tracing::{debug, warn};

use crate::extensions::FilterEvent;
use crate::interaction::{ControlSource, ReadinessOutcome};
use crate::render::ChartSurface;

use super::FilterEngine;

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Advances timers to `now`: fires elapsed debounces and deferred tab
    /// reapplies, and polls the surface while waiting for readiness.
    ///
    /// Returns the number of charts redrawn.
    pub fn tick(&mut self, now: Duration) -> usize {
        let due = self.scheduler.take_due(now);
        let mut redrawn = 0;

        if due.poll_readiness {
            match self.scheduler.record_poll(self.surface.is_ready(), now) {
                ReadinessOutcome::Ready => {
                    debug!("chart surface became ready");
                    self.emit_event(FilterEvent::SurfaceReady);
                    if self.deferred_apply {
                        redrawn += self.apply_filters();
                    }
                }
                ReadinessOutcome::StillWaiting => {}
                ReadinessOutcome::GaveUp => {
                    warn!("chart surface never became ready; filters stay inactive");
                    self.emit_event(FilterEvent::SurfaceUnavailable);
                }
            }
        }

        if due.reapply {
            redrawn += self.reapply();
        } else if due.apply_filters {
            redrawn += self.apply_filters();
        }
        redrawn
    }

    /// Host signal that the chart surface finished constructing its charts.
    pub fn on_surface_ready(&mut self) -> usize {
        self.mark_surface_ready();
        if self.deferred_apply {
            return self.apply_filters();
        }
        0
    }

    /// Schedules a reapply after a tab switch so lazily rendered panels are
    /// filtered once they exist.
    pub fn on_tab_switched(&mut self, now: Duration) {
        self.scheduler.schedule_tab_reapply(now);
    }

    pub(super) fn mark_surface_ready(&mut self) {
        if self.scheduler.is_ready() {
            return;
        }
        self.scheduler.mark_ready();
        self.emit_event(FilterEvent::SurfaceReady);
    }
}
