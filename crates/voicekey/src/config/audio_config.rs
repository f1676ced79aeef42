use serde::{Deserialize, Serialize};

/// Audio device configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Name of the preferred input device, or None for the system default.
    #[serde(default)]
    pub selected_device: Option<String>,
}
