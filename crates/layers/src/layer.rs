use foundation::LayerId;
use serde::{Deserialize, Serialize};

/// Host-side description of a vector layer holding shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerOptions {
    pub id: LayerId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub z_index: i32,
    /// Ask the renderer to call back into the host for per-feature styles.
    #[serde(default)]
    pub custom_style: bool,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

impl LayerOptions {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            name: String::new(),
            visible: true,
            opacity: 1.0,
            z_index: 0,
            custom_style: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_custom_style(mut self, enabled: bool) -> Self {
        self.custom_style = enabled;
        self
    }
}
