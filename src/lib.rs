/*!
 * # EchoPath - translation, transcription and OCR core
 *
 * A Rust library exposing a uniform translation facade over several
 * independent backends:
 *
 * - Neural MT model family (three direction-specific model handles)
 * - Cloud translation service (fallback tier)
 * - Speech-to-text engine (deterministic decoding)
 * - OCR engine (multi-pass extraction strategies)
 *
 * ## Features
 *
 * - Short UI language codes mapped to each backend's native tag space
 * - Bounded two-tier fallback chain with degraded-result marking
 * - Best-effort romanization of native-script output
 * - Multi-pass OCR extraction with one-shot image preprocessing
 * - Fire-and-forget translation history
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `language`: Short-code registry and source auto-detection
 * - `backends`: Translation backend adapters:
 *   - `backends::neural`: Neural MT adapter and model handle cache
 *   - `backends::cloud`: Cloud service client
 * - `dispatch`: The translation dispatcher and fallback policy
 * - `romanize`: Native-script romanization post-processing
 * - `ocr`: OCR extraction pipeline
 * - `transcribe`: Speech transcription adapter
 * - `history`: Translation history sink
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod backends;
pub mod dispatch;
pub mod errors;
pub mod history;
pub mod language;
pub mod ocr;
pub mod romanize;
pub mod transcribe;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use backends::{BackendKind, TranslationBackend};
pub use dispatch::{Dispatcher, TranslationRequest, TranslationResult};
pub use errors::{AppError, OcrError, TranscribeError, TranslateError};
pub use language::{LanguageCode, AUTO_CODE};
pub use ocr::{OcrExtractor, OcrOutcome};
pub use transcribe::{TranscriptOutcome, TranscriptionAdapter};
