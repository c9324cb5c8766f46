use indexmap::IndexMap;

use crate::core::{ControlElement, ControlValue};
use crate::error::{FilterError, FilterResult};
use crate::interaction::ControlSource;

/// Headless control source holding elements in discovery order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryControls {
    elements: IndexMap<String, ControlElement>,
}

impl InMemoryControls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: ControlElement) {
        self.elements.insert(element.id.clone(), element);
    }

    #[must_use]
    pub fn with(mut self, element: ControlElement) -> Self {
        self.insert(element);
        self
    }

    /// Simulates a user interaction and returns the new value for the change
    /// handler.
    pub fn set_value(&mut self, id: &str, value: ControlValue) -> FilterResult<ControlValue> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| FilterError::UnknownControl(id.to_owned()))?;
        element.value = value.clone();
        Ok(value)
    }

    #[must_use]
    pub fn value(&self, id: &str) -> Option<&ControlValue> {
        self.elements.get(id).map(|element| &element.value)
    }
}

impl ControlSource for InMemoryControls {
    fn control_ids(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    fn element(&self, id: &str) -> Option<&ControlElement> {
        self.elements.get(id)
    }

    fn mark_initialized(&mut self, id: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.initialized = true;
        }
    }

    fn write_value(&mut self, id: &str, value: ControlValue) -> FilterResult<()> {
        self.set_value(id, value).map(|_| ())
    }
}
