//! On-disk transcript history.
//!
//! Every delivered dictation is appended to two files under a per-day
//! directory: a human-readable `.txt` with one timestamped line per entry,
//! and a `.jsonl` with the structured record for tooling. Failures here are
//! logged and swallowed by the caller; history must never block delivery.

use crate::{AppError, AppResult};

use std::{
    fs::{self, OpenOptions},
    io::Write,
    panic::Location,
    path::PathBuf,
};

use chrono::Local;
use error_location::ErrorLocation;
use serde::Serialize;
use tracing::{debug, instrument};
use voicekey_core::RecognitionResult;

/// One structured transcript record, serialized per line into the `.jsonl`.
#[derive(Debug, Serialize)]
struct TranscriptRecord<'a> {
    timestamp: String,
    backend: String,
    source: &'a str,
    text: &'a str,
}

/// Appends recognized text to dated transcript files.
pub struct TranscriptLog {
    results_dir: PathBuf,
}

impl TranscriptLog {
    /// Create a log rooted at `results_dir`. The directory is created on
    /// first append, not here.
    pub fn new(results_dir: PathBuf) -> Self {
        Self { results_dir }
    }

    /// Append one recognition result to today's transcript files.
    #[instrument(skip(self, result), fields(text_len = result.text.len()))]
    pub fn append(&self, result: &RecognitionResult) -> AppResult<()> {
        let now = Local::now();
        let date = now.format("%Y-%m-%d").to_string();

        let day_dir = self.results_dir.join(&date);
        fs::create_dir_all(&day_dir)?;

        let line = format!("[{}] {}\n", now.format("%H:%M:%S"), result.text);
        Self::append_line(day_dir.join(format!("{}.txt", date)), &line)?;

        let record = TranscriptRecord {
            timestamp: now.to_rfc3339(),
            backend: result.backend.to_string(),
            source: &result.source_ref,
            text: &result.text,
        };
        let json = serde_json::to_string(&record).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize transcript record: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Self::append_line(day_dir.join(format!("{}.jsonl", date)), &format!("{}\n", json))?;

        debug!(date, "Transcript appended");

        Ok(())
    }

    #[track_caller]
    fn append_line(path: PathBuf, line: &str) -> AppResult<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
