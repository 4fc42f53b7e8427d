/*!
 * Error types for the echopath translation core.
 *
 * This module contains custom error types for the different parts of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 *
 * "No text found" (OCR) and "no speech detected" (transcription) are not
 * errors; they are distinguished outcomes modelled in their own modules.
 */

use thiserror::Error;

use crate::language::LanguageCode;

/// Errors that can occur during translation dispatch
#[derive(Error, Debug)]
pub enum TranslateError {
    /// One or both language codes are outside the supported set
    #[error("Unsupported language codes: src={source_code}, tgt={target_code}. Supported: {}", supported.join(", "))]
    UnsupportedLanguage {
        /// Requested source code (as given, may be unregistered)
        source_code: String,
        /// Requested target code
        target_code: String,
        /// The full supported short-code list, to aid correction
        supported: Vec<&'static str>,
    },

    /// Backend runtime failure (model load, tokenization, generation)
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// No translation backend is configured or available
    #[error("No translation backend available. Supported codes: {}", supported.join(", "))]
    NoBackendAvailable {
        /// The supported short-code list
        supported: Vec<&'static str>,
    },
}

impl TranslateError {
    /// Build an unsupported-language error for a code pair, enumerating
    /// the supported set
    pub fn unsupported(source: &str, target: &str) -> Self {
        Self::UnsupportedLanguage {
            source_code: source.to_string(),
            target_code: target.to_string(),
            supported: LanguageCode::supported_codes(),
        }
    }

    /// Build a no-backend error enumerating the supported set
    pub fn no_backend() -> Self {
        Self::NoBackendAvailable {
            supported: LanguageCode::supported_codes(),
        }
    }
}

/// Errors that can occur when driving the OCR engine
#[derive(Error, Debug)]
pub enum OcrError {
    /// The image payload could not be decoded
    #[error("Failed to decode image: {0}")]
    InvalidImage(String),

    /// The OCR engine itself failed (empty text is not an engine failure)
    #[error("OCR engine failed: {0}")]
    EngineFailed(String),
}

/// Errors that can occur during speech transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// The audio payload could not be staged for the engine
    #[error("Failed to stage audio input: {0}")]
    InvalidAudio(String),

    /// The speech-to-text engine failed
    #[error("Transcription failed: {0}")]
    EngineFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from translation dispatch
    #[error("Translation error: {0}")]
    Translation(#[from] TranslateError),

    /// Error from the OCR pipeline
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscribeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
