//! dash-filter: headless filter and re-aggregation engine for static dashboards.
//!
//! The host owns the widgets and the charting library and exposes them through
//! `interaction::ControlSource` and `render::ChartSurface`. `FilterEngine`
//! keeps control state and chart snapshots and recomputes every chart from its
//! snapshot on each change.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FilterEngine, FilterEngineConfig, ResetTarget};
pub use error::{FilterError, FilterResult};
