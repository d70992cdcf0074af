use std::env;

use serde::{Deserialize, Serialize};

/// Bridge tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Geometries with more coordinates than this are reported back to the
    /// host without coordinates.
    pub serialization_limit: usize,

    /// Upper bound on renderer events handled by one `pump` call.
    pub max_events_per_pump: usize,

    /// Emit a host event for each host-side add/remove/update.
    pub acknowledge_host_writes: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            serialization_limit: 100_000,
            max_events_per_pump: 1024,
            acknowledge_host_writes: true,
        }
    }
}

impl BridgeConfig {
    /// Defaults overridden by `SHAPES_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        Self {
            serialization_limit: env_var_usize(
                "SHAPES_SERIALIZATION_LIMIT",
                self.serialization_limit,
            ),
            max_events_per_pump: env_var_usize(
                "SHAPES_MAX_EVENTS_PER_PUMP",
                self.max_events_per_pump,
            ),
            acknowledge_host_writes: env_var_bool(
                "SHAPES_ACKNOWLEDGE_HOST_WRITES",
                self.acknowledge_host_writes,
            ),
        }
    }
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_bool(key: &str, default: bool) -> bool {
    match env::var(key).ok().as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}
