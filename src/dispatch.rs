/*!
 * Translation dispatcher: the single entry point for translation requests.
 *
 * Selects a backend, applies the bounded fallback chain, and normalizes
 * results (romanization, history) regardless of which backend produced them.
 *
 * The chain is two tiers with at most one fallback hop: neural first when
 * configured, cloud on neural failure, and the original neural error
 * surfaced when both fail. No retries beyond that.
 */

use log::{info, warn};
use std::sync::Arc;

use crate::backends::{BackendKind, TranslationBackend};
use crate::errors::TranslateError;
use crate::history::{HistorySink, TranslationRecord};
use crate::language::{BackendFamily, LanguageCode};
use crate::romanize::romanize;

/// A translation request
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Source short code, or "auto"
    pub source: String,
    /// Target short code
    pub target: String,
}

impl TranslationRequest {
    /// Convenience constructor
    pub fn new(text: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { text: text.into(), source: source.into(), target: target.into() }
    }
}

/// A translation result
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// The translated text (empty for empty input)
    pub translated_text: String,
    /// Resolved source tag, in the producing backend's tag space
    pub source_tag: String,
    /// Resolved target tag, in the producing backend's tag space
    pub target_tag: String,
    /// Romanized form of the output, for native-script targets
    pub romanized_text: Option<String>,
    /// The backend that produced the result; `None` for the empty-input
    /// short circuit, which invokes no backend
    pub backend: Option<BackendKind>,
    /// True when a fallback backend produced the result instead of the
    /// primary
    pub degraded: bool,
}

impl TranslationResult {
    fn empty() -> Self {
        Self {
            translated_text: String::new(),
            source_tag: String::new(),
            target_tag: String::new(),
            romanized_text: None,
            backend: None,
            degraded: false,
        }
    }
}

/// The translation dispatcher.
///
/// Backend availability is decided once, at construction: a backend that is
/// not configured is simply absent here. Adapters classify their own errors;
/// the dispatcher owns the fallback policy.
pub struct Dispatcher {
    neural: Option<Arc<dyn TranslationBackend>>,
    cloud: Option<Arc<dyn TranslationBackend>>,
    history: Option<Arc<dyn HistorySink>>,
}

impl Dispatcher {
    /// Create a dispatcher with no backends configured
    pub fn new() -> Self {
        Self { neural: None, cloud: None, history: None }
    }

    /// Configure the primary neural backend
    pub fn with_neural(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.neural = Some(backend);
        self
    }

    /// Configure the cloud fallback backend
    pub fn with_cloud(mut self, backend: Arc<dyn TranslationBackend>) -> Self {
        self.cloud = Some(backend);
        self
    }

    /// Configure the fire-and-forget history sink
    pub fn with_history(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// Translate a request through the fallback chain.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError> {
        // Empty text short-circuits without invoking any backend
        if request.text.trim().is_empty() {
            return Ok(TranslationResult::empty());
        }

        let result = match (&self.neural, &self.cloud) {
            (Some(neural), cloud) => {
                match neural.translate(&request.text, &request.source, &request.target).await {
                    Ok(translation) => self.finish(request, translation.text, translation.source_tag, translation.target_tag, BackendKind::Neural, false),
                    Err(primary_err) => {
                        let Some(cloud) = cloud else {
                            return Err(primary_err);
                        };
                        warn!("Neural backend failed ({}), falling back to cloud", primary_err);
                        match cloud.translate(&request.text, &request.source, &request.target).await {
                            Ok(translation) => self.finish(request, translation.text, translation.source_tag, translation.target_tag, BackendKind::Cloud, true),
                            // Surface the primary error, never the fallback's
                            Err(fallback_err) => {
                                warn!("Cloud fallback also failed: {}", fallback_err);
                                return Err(primary_err);
                            }
                        }
                    }
                }
            }
            (None, Some(cloud)) => {
                let translation = cloud.translate(&request.text, &request.source, &request.target).await?;
                self.finish(request, translation.text, translation.source_tag, translation.target_tag, BackendKind::Cloud, false)
            }
            (None, None) => return Err(TranslateError::no_backend()),
        };

        self.record(request, &result);
        Ok(result)
    }

    /// Assemble the result and apply romanization.
    ///
    /// Romanization keys off the request's target code in the neural tag
    /// space so the output is consistent regardless of producing backend.
    /// It is cosmetic: any miss yields `None`, never an error.
    fn finish(
        &self,
        request: &TranslationRequest,
        text: String,
        source_tag: String,
        target_tag: String,
        backend: BackendKind,
        degraded: bool,
    ) -> TranslationResult {
        // Targets outside the registry (cloud pass-through) are never
        // romanized; the script table only covers the supported set
        let romanized_text = LanguageCode::from_short(&request.target)
            .map(|code| code.native_tag(BackendFamily::Neural))
            .and_then(|script_tag| romanize(&text, script_tag))
            .filter(|r| !r.trim().is_empty());

        TranslationResult {
            translated_text: text,
            source_tag,
            target_tag,
            romanized_text,
            backend: Some(backend),
            degraded,
        }
    }

    /// Fire-and-forget history write. Sink failure never fails a response.
    fn record(&self, request: &TranslationRequest, result: &TranslationResult) {
        let Some(sink) = &self.history else {
            return;
        };

        let record = TranslationRecord::from_result(request, result);
        let sink = Arc::clone(sink);
        tokio::spawn(async move {
            if let Err(e) = sink.save(record).await {
                warn!("History sink failed (ignored): {}", e);
            }
        });
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a one-line summary of a finished translation
pub fn log_result(result: &TranslationResult) {
    info!(
        "Translated {} -> {} via {} (degraded={})",
        result.source_tag,
        result.target_tag,
        result.backend.map(|b| b.display_name()).unwrap_or("none"),
        result.degraded
    );
}
