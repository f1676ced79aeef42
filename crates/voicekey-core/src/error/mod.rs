use error_location::ErrorLocation;
use thiserror::Error;

/// Audio capture and encoding errors with source location tracking.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// WAV serialization failed.
    #[error("WAV encoding error: {reason} {location}")]
    WavEncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Speech recognition errors with source location tracking.
///
/// Recognition failures are never fatal: callers log them and return the
/// gesture to idle. There is no automatic retry.
#[derive(Error, Debug)]
pub enum AsrError {
    /// No usable credentials configured for the selected backend.
    #[error("Missing credentials: {reason} {location}")]
    MissingCredentials {
        /// Which credentials are missing.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport-level failure (connect, TLS, timeout, non-success status).
    #[error("Recognition request failed: {reason} {location}")]
    RequestFailed {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend answered with a structured API error.
    #[error("Recognition API error: {code} - {message} {location}")]
    Api {
        /// Vendor error code.
        code: String,
        /// Vendor error message.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend answered but the body was not in the expected shape.
    #[error("Malformed recognition response: {reason} {location}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Reading the audio artifact from disk failed.
    #[error("Failed to read audio file: {source} {location}")]
    AudioRead {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`AudioError`].
pub type Result<T> = std::result::Result<T, AudioError>;

/// Result type alias using [`AsrError`].
pub type AsrResult<T> = std::result::Result<T, AsrError>;
