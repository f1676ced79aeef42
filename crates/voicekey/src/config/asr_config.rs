use serde::{Deserialize, Serialize};
use voicekey_core::{AsrService, BackendCredentials, TencentCredentials, VolcengineCredentials};

/// Recognition backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Which backend handles recognition calls.
    #[serde(default = "default_service")]
    pub service: AsrService,
    /// Volcengine credentials, required when `service = "volcengine"`.
    #[serde(default)]
    pub volcengine: Option<VolcengineCredentials>,
    /// Tencent credential sets, at least one required when `service = "tencent"`.
    #[serde(default)]
    pub tencent: Vec<TencentCredentials>,
}

fn default_service() -> AsrService {
    AsrService::Volcengine
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            volcengine: None,
            tencent: Vec::new(),
        }
    }
}

impl AsrConfig {
    /// Credentials in the shape the dispatcher consumes.
    pub fn credentials(&self) -> BackendCredentials {
        BackendCredentials {
            volcengine: self.volcengine.clone(),
            tencent: self.tencent.clone(),
        }
    }
}
