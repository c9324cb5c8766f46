use crate::error::{FilterError, FilterResult};
use crate::extensions::FilterPlugin;
use crate::interaction::ControlSource;
use crate::render::ChartSurface;

use super::FilterEngine;

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    /// Registers an observer plugin under a unique id.
    pub fn register_plugin(&mut self, plugin: Box<dyn FilterPlugin>) -> FilterResult<()> {
        let plugin_id = plugin.id();
        if plugin_id.is_empty() {
            return Err(FilterError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(plugin_id) {
            return Err(FilterError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Returns `true` when a plugin was removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|plugin| plugin.id() != plugin_id);
        self.plugins.len() != before
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == plugin_id)
    }
}
