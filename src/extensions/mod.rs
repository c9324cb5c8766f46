//! Observer hooks for hosts embedding the engine.

pub mod plugins;

pub use plugins::{FilterContext, FilterEvent, FilterPlugin};
