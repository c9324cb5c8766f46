use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{ControlKind, ControlState, ControlType, ControlValue};
use crate::extensions::FilterEvent;
use crate::interaction::ControlSource;
use crate::render::ChartSurface;

use super::FilterEngine;

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Discovers controls, records their defaults and runs the first filter
    /// pass once the chart surface is ready.
    ///
    /// Already-initialized elements are skipped, so calling this again only
    /// picks up controls added since the last call.
    pub fn initialize(&mut self, now: Duration) -> usize {
        let registered = self.discover_controls();

        if self.scheduler.is_ready() || self.surface.is_ready() {
            self.mark_surface_ready();
            self.apply_filters();
        } else {
            debug!("chart surface not ready; deferring first filter pass");
            self.deferred_apply = true;
            self.scheduler.begin_waiting(now);
        }
        registered
    }

    fn discover_controls(&mut self) -> usize {
        let mut registered = 0;
        for id in self.controls.control_ids() {
            let Some(element) = self.controls.element(&id) else {
                continue;
            };
            if element.initialized {
                continue;
            }

            match ControlState::from_element(element) {
                Ok(state) => {
                    let normalized = state.value();
                    if normalized != element.value {
                        debug!(control = %id, "normalizing DOM value to registered state");
                        if let Err(err) = self.controls.write_value(&id, normalized) {
                            warn!(control = %id, error = %err, "failed to write control value back");
                        }
                    }
                    debug!(
                        control = %id,
                        filter_var = %state.filter_var,
                        control_type = state.control_type().as_str(),
                        "registered control"
                    );
                    self.defaults.insert(id.clone(), state.clone());
                    self.registry.insert(id.clone(), state);
                    self.controls.mark_initialized(&id);
                    registered += 1;
                    self.emit_event(FilterEvent::ControlRegistered { id });
                }
                Err(reason) => {
                    warn!(control = %id, ?reason, "skipping control");
                    self.controls.mark_initialized(&id);
                    self.emit_event(FilterEvent::ControlSkipped { id, reason });
                }
            }
        }
        registered
    }

    /// Change/input handler: syncs state from the DOM value and re-filters.
    ///
    /// Text controls are debounced; the pass runs from `tick` once the
    /// debounce window elapses without further input.
    pub fn on_control_changed(&mut self, id: &str, now: Duration) {
        let Some(value) = self.controls.element(id).map(|element| element.value.clone()) else {
            debug!(control = id, "change event for element missing from the DOM");
            return;
        };
        let Some(state) = self.registry.get_mut(id) else {
            debug!(control = id, "change event for unregistered control");
            return;
        };
        state.set_value(&value);
        let is_text = state.control_type() == ControlType::Text;
        let normalized = state.value();
        if normalized != value {
            if let Err(err) = self.controls.write_value(id, normalized) {
                warn!(control = id, error = %err, "failed to write control value back");
            }
        }
        self.emit_event(FilterEvent::ControlChanged { id: id.to_owned() });

        if is_text {
            self.scheduler.schedule_text(id, now);
        } else {
            self.apply_filters();
        }
    }

    /// Selects every option of a multi-value control and re-filters.
    pub fn select_all(&mut self, id: &str) {
        let Some(state) = self.registry.get(id) else {
            debug!(control = id, "select_all on unknown control");
            return;
        };
        let selectable = match &state.kind {
            ControlKind::Select { multiple, .. } => *multiple,
            ControlKind::Checkbox { .. } => true,
            _ => false,
        };
        if !selectable {
            debug!(control = id, "select_all ignored for single-value control");
            return;
        }
        let options = self
            .controls
            .element(id)
            .map(|element| element.options.clone())
            .unwrap_or_default();
        self.set_control_value(id, ControlValue::Selection(options));
    }

    /// Clears the selection of a control and re-filters.
    pub fn clear_all(&mut self, id: &str) {
        let Some(state) = self.registry.get(id) else {
            debug!(control = id, "clear_all on unknown control");
            return;
        };
        let cleared = match state.control_type() {
            ControlType::Select
            | ControlType::Checkbox
            | ControlType::Radio
            | ControlType::ButtonGroup => ControlValue::Selection(Vec::new()),
            ControlType::Text => {
                self.scheduler.cancel_text(id);
                ControlValue::Text(String::new())
            }
            ControlType::Switch | ControlType::Slider | ControlType::Number => {
                debug!(control = id, "clear_all ignored for scalar control");
                return;
            }
        };
        self.set_control_value(id, cleared);
    }

    fn set_control_value(&mut self, id: &str, value: ControlValue) {
        if let Some(state) = self.registry.get_mut(id) {
            state.set_value(&value);
            let synced = state.value();
            if let Err(err) = self.controls.write_value(id, synced) {
                warn!(control = id, error = %err, "failed to write control value back");
            }
        }
        self.emit_event(FilterEvent::ControlChanged { id: id.to_owned() });
        self.apply_filters();
    }
}
