use serde::{Deserialize, Serialize};

use crate::core::SkipReason;
use crate::interaction::Readiness;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    pub controls_len: usize,
    pub snapshots_len: usize,
    pub readiness: Readiness,
    pub passes: u64,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterEvent {
    ControlRegistered { id: String },
    ControlSkipped { id: String, reason: SkipReason },
    ControlChanged { id: String },
    FiltersApplied { charts: usize },
    CrossTabRebuilt { chart_id: String },
    FiltersReset { controls: usize },
    SurfaceReady,
    SurfaceUnavailable,
}

/// Observer interface for diagnostics and host integrations.
///
/// Plugins see events and engine context but cannot mutate engine state.
pub trait FilterPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &FilterEvent, context: FilterContext);
}
