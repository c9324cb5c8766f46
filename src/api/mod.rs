mod control_registry;
mod cross_tab_controller;
mod engine;
mod engine_config;
mod engine_snapshot;
mod filter_controller;
mod filter_plan;
mod plugin_dispatch;
mod plugin_registry;
mod reset_controller;
mod scheduler_controller;

pub use engine::FilterEngine;
pub use engine_config::FilterEngineConfig;
pub use engine_snapshot::{
    ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshot, EngineSnapshotJsonContractV1,
};
pub use reset_controller::{ATTR_RESET_TARGET, ResetTarget};
