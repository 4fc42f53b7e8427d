/*!
 * Speech transcription adapter.
 *
 * Wraps an opaque speech-to-text engine with pinned, deterministic decoding
 * parameters so repeated calls on identical audio return identical text.
 * An empty transcription is a distinguished "no speech detected" outcome,
 * not an error.
 */

use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::errors::TranscribeError;

/// Deterministic decoding parameters.
///
/// Temperature is held at zero and decoding uses a fixed beam; thresholds
/// are the engine family's conventional defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    /// Sampling temperature; zero for greedy/beam determinism
    pub temperature: f32,
    /// Beam width
    pub beam_size: usize,
    /// Beam search patience
    pub patience: f32,
    /// Segments with a higher no-speech probability are dropped
    pub no_speech_threshold: f32,
    /// Segments with a higher compression ratio are treated as noise
    pub compression_ratio_threshold: f32,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            beam_size: 5,
            patience: 1.0,
            no_speech_threshold: 0.6,
            compression_ratio_threshold: 2.4,
        }
    }
}

/// Speech-to-text engine collaborator
pub trait SpeechEngine: Send + Sync {
    /// Transcribe an audio file with the given decoding parameters
    fn transcribe(&self, audio: &Path, params: &DecodeParams) -> anyhow::Result<String>;
}

/// Outcome of a transcription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Transcribed text, trimmed
    Text(String),
    /// The engine ran but heard nothing
    NoSpeech,
}

impl TranscriptOutcome {
    /// The transcribed text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            TranscriptOutcome::Text(text) => Some(text),
            TranscriptOutcome::NoSpeech => None,
        }
    }
}

/// The transcription adapter
pub struct TranscriptionAdapter {
    engine: Arc<dyn SpeechEngine>,
    params: DecodeParams,
}

impl TranscriptionAdapter {
    /// Create an adapter with the default deterministic parameters
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self { engine, params: DecodeParams::default() }
    }

    /// The pinned decoding parameters
    pub fn params(&self) -> &DecodeParams {
        &self.params
    }

    /// Transcribe an audio file on disk
    pub async fn transcribe_file(&self, path: &Path) -> Result<TranscriptOutcome, TranscribeError> {
        let engine = Arc::clone(&self.engine);
        let params = self.params;
        let path: PathBuf = path.to_path_buf();

        // Decoding is a long CPU-bound call; run it off the async executor
        let raw = tokio::task::spawn_blocking(move || engine.transcribe(&path, &params))
            .await
            .map_err(|e| TranscribeError::EngineFailed(format!("transcription task failed: {}", e)))?
            .map_err(|e| TranscribeError::EngineFailed(e.to_string()))?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            debug!("Transcription produced no speech");
            return Ok(TranscriptOutcome::NoSpeech);
        }
        Ok(TranscriptOutcome::Text(trimmed.to_string()))
    }

    /// Transcribe an in-memory audio upload.
    ///
    /// The payload is staged in a scoped temp file that is removed on every
    /// exit path, including errors.
    pub async fn transcribe_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<TranscriptOutcome, TranscribeError> {
        let mut staged = NamedTempFile::with_suffix(format!(".{}", extension.trim_start_matches('.')))
            .map_err(|e| TranscribeError::InvalidAudio(e.to_string()))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.flush())
            .map_err(|e| TranscribeError::InvalidAudio(e.to_string()))?;

        // The temp file guard must outlive the engine call
        let outcome = self.transcribe_file(staged.path()).await;
        drop(staged);
        outcome
    }
}
