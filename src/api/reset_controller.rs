use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ControlElement, ControlType};
use crate::extensions::FilterEvent;
use crate::interaction::ControlSource;
use crate::render::ChartSurface;

use super::FilterEngine;

/// Attribute on a reset trigger naming the single control it resets.
pub const ATTR_RESET_TARGET: &str = "data-reset-target";

/// What a reset restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetTarget {
    All,
    Control(String),
}

impl ResetTarget {
    /// Reads the target from the element that triggered the reset.
    #[must_use]
    pub fn from_trigger(trigger: &ControlElement) -> Self {
        trigger
            .attribute(ATTR_RESET_TARGET)
            .map_or(Self::All, |id| Self::Control(id.trim().to_owned()))
    }
}

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Restores controls to their initial values, syncs the DOM and runs one
    /// filter pass. Discovery is not re-run.
    pub fn reset_filters(&mut self, target: ResetTarget) -> usize {
        let ids: Vec<String> = match &target {
            ResetTarget::All => self.defaults.keys().cloned().collect(),
            ResetTarget::Control(id) if self.defaults.contains_key(id) => vec![id.clone()],
            ResetTarget::Control(id) => {
                debug!(control = %id, "reset requested for unknown control");
                return 0;
            }
        };

        for id in &ids {
            let Some(default) = self.defaults.get(id).cloned() else {
                continue;
            };
            if default.control_type() == ControlType::Text {
                self.scheduler.cancel_text(id);
            }
            if let Err(err) = self.controls.write_value(id, default.value()) {
                warn!(control = %id, error = %err, "failed to restore control value");
            }
            self.registry.insert(id.clone(), default);
        }

        debug!(controls = ids.len(), "filters reset");
        self.emit_event(FilterEvent::FiltersReset {
            controls: ids.len(),
        });
        self.apply_filters()
    }

    /// Resets from a trigger element (a reset button with an optional target).
    pub fn reset_from_trigger(&mut self, trigger: &ControlElement) -> usize {
        self.reset_filters(ResetTarget::from_trigger(trigger))
    }
}
