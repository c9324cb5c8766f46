mod in_memory_controls;
mod scheduler;

pub use in_memory_controls::InMemoryControls;
pub use scheduler::{DueWork, FilterScheduler, Readiness, ReadinessOutcome};

use crate::core::{ControlElement, ControlValue};
use crate::error::FilterResult;

/// DOM side of the control contract.
///
/// Hosts expose every candidate control element in discovery order together
/// with its attributes, current value and one-time initialization marker.
pub trait ControlSource {
    fn control_ids(&self) -> Vec<String>;
    fn element(&self, id: &str) -> Option<&ControlElement>;
    fn mark_initialized(&mut self, id: &str);
    /// Writes a value back into the DOM control without firing change events.
    fn write_value(&mut self, id: &str, value: ControlValue) -> FilterResult<()>;
}
