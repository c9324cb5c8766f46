use serde::{Deserialize, Serialize};

use crate::core::ControlState;
use crate::error::{FilterError, FilterResult};
use crate::interaction::{ControlSource, Readiness};
use crate::render::{ChartSurface, LiveChart};

use super::FilterEngine;

pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub controls: Vec<ControlState>,
    pub defaults: Vec<ControlState>,
    pub readiness: Readiness,
    pub passes: u64,
    pub charts: Vec<LiveChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

impl<S: ChartSurface, C: ControlSource> FilterEngine<S, C> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            controls: self.registry.values().cloned().collect(),
            defaults: self.defaults.values().cloned().collect(),
            readiness: self.scheduler.readiness(),
            passes: self.passes,
            charts: self
                .surface
                .chart_ids()
                .iter()
                .filter_map(|id| self.surface.chart(id).cloned())
                .collect(),
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> FilterResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> FilterResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            FilterError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> FilterResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<EngineSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: EngineSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            FilterError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(FilterError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
