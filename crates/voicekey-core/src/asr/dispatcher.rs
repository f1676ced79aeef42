//! Backend selection and runtime switching.
//!
//! Exactly two backend implementations live behind one `recognize` entry
//! point, chosen at construction and swappable via [`AsrDispatcher::reload`]
//! without restarting the hotkey listener.

use crate::{
    AsrError, AsrResult,
    asr::{
        AsrService, RecognitionRequest, RecognitionResult, TencentClient, TencentCredentials,
        VolcengineClient, VolcengineCredentials,
    },
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::RwLock;
use tracing::{info, instrument};

/// Credentials for both backends, as read from configuration.
///
/// Only the selected backend's credentials must be present; switching to a
/// backend with no credentials fails the reload, not the process.
#[derive(Debug, Clone, Default)]
pub struct BackendCredentials {
    /// Backend A credentials.
    pub volcengine: Option<VolcengineCredentials>,
    /// Backend B credential sets (one picked at random per call).
    pub tencent: Vec<TencentCredentials>,
}

/// Tagged backend variant. Clients are cheap to clone (shared HTTP pool),
/// so an in-flight call keeps its client across a `reload`.
#[derive(Debug, Clone)]
enum Backend {
    Volcengine(VolcengineClient),
    Tencent(TencentClient),
}

impl Backend {
    #[track_caller]
    fn build(service: AsrService, credentials: &BackendCredentials) -> AsrResult<Self> {
        match service {
            AsrService::Volcengine => {
                let creds =
                    credentials
                        .volcengine
                        .clone()
                        .ok_or_else(|| AsrError::MissingCredentials {
                            reason: "No Volcengine credentials configured".to_string(),
                            location: ErrorLocation::from(Location::caller()),
                        })?;
                Ok(Backend::Volcengine(VolcengineClient::new(creds)))
            }
            AsrService::Tencent => Ok(Backend::Tencent(TencentClient::new(
                credentials.tencent.clone(),
            )?)),
        }
    }

    fn service(&self) -> AsrService {
        match self {
            Backend::Volcengine(_) => AsrService::Volcengine,
            Backend::Tencent(_) => AsrService::Tencent,
        }
    }
}

/// Hands buffered audio to the configured backend.
pub struct AsrDispatcher {
    backend: RwLock<Backend>,
}

impl AsrDispatcher {
    /// Build the dispatcher with the configured backend.
    ///
    /// Fails when the selected backend has no usable credentials — without
    /// them no recognition call could ever succeed, so this is surfaced at
    /// startup rather than on the first gesture.
    #[track_caller]
    #[instrument(skip(credentials))]
    pub fn new(service: AsrService, credentials: &BackendCredentials) -> AsrResult<Self> {
        let backend = Backend::build(service, credentials)?;

        info!(%service, "ASR dispatcher initialized");

        Ok(Self {
            backend: RwLock::new(backend),
        })
    }

    /// Which backend is currently selected.
    pub async fn service(&self) -> AsrService {
        self.backend.read().await.service()
    }

    /// Atomically replace the backend client.
    ///
    /// Has no effect on an in-flight recognition call: such a call already
    /// cloned its client before the swap.
    #[instrument(skip(self, credentials))]
    pub async fn reload(
        &self,
        service: AsrService,
        credentials: &BackendCredentials,
    ) -> AsrResult<()> {
        let rebuilt = Backend::build(service, credentials)?;
        *self.backend.write().await = rebuilt;

        info!(%service, "ASR backend reloaded");

        Ok(())
    }

    /// Perform one recognition call.
    ///
    /// Failures are returned to the caller and never retried; the caller is
    /// responsible for returning the gesture to idle either way.
    #[instrument(skip(self, request))]
    pub async fn recognize(&self, request: RecognitionRequest) -> AsrResult<RecognitionResult> {
        let backend = self.backend.read().await.clone();

        let source_ref = request.source.reference();
        let wav_bytes = request.source.into_bytes()?;

        let text = match &backend {
            Backend::Volcengine(client) => client.recognize(&wav_bytes).await?,
            Backend::Tencent(client) => client.recognize(&wav_bytes).await?,
        };

        Ok(RecognitionResult {
            backend: backend.service(),
            text,
            source_ref,
        })
    }
}
