/*!
 * Application controller: builds the translation core out of configuration
 * and injected engine collaborators, and exposes the operations the binary
 * (or an embedding server) calls.
 *
 * Backend availability is evaluated here, once, at startup. The dispatcher
 * receives only the backends that are actually configured; there is no
 * runtime feature probing after construction.
 */

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::backends::cloud::CloudBackend;
use crate::backends::neural::{ModelProvider, NeuralBackend};
use crate::backends::TranslationBackend;
use crate::dispatch::{Dispatcher, TranslationRequest, TranslationResult};
use crate::errors::AppError;
use crate::history::{HistorySink, NullHistorySink, SqliteHistorySink};
use crate::language::{LanguageDetector, WhatlangDetector};
use crate::ocr::{OcrEngine, OcrExtractor, OcrOutcome};
use crate::transcribe::{SpeechEngine, TranscriptionAdapter, TranscriptOutcome};

/// Main application controller
pub struct Controller {
    config: Config,
    dispatcher: Dispatcher,
    neural: Option<Arc<NeuralBackend>>,
    ocr: Option<OcrExtractor>,
    transcription: Option<TranscriptionAdapter>,
}

impl Controller {
    /// Build a controller from configuration alone. The neural backend
    /// requires an injected model provider, so this wiring is cloud-only;
    /// use [`Controller::builder`] to attach engines.
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a controller with injected engine collaborators
    pub fn builder(config: Config) -> ControllerBuilder {
        ControllerBuilder {
            config,
            model_provider: None,
            ocr_engine: None,
            speech_engine: None,
            history: None,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Warm the neural model handles when configured to preload
    pub async fn warmup(&self) -> Result<(), AppError> {
        if let Some(neural) = &self.neural {
            neural.preload().await.map_err(AppError::Translation)?;
        }
        Ok(())
    }

    /// Translate text through the dispatch chain
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, AppError> {
        let request = TranslationRequest::new(text, source, target);
        Ok(self.dispatcher.translate(&request).await?)
    }

    /// Extract text from an image, then translate it
    pub async fn translate_image(
        &self,
        image_bytes: &[u8],
        source: &str,
        target: &str,
    ) -> Result<Option<TranslationResult>, AppError> {
        let Some(ocr) = &self.ocr else {
            return Err(AppError::Unknown("no OCR engine configured".to_string()));
        };

        match ocr.extract_bytes(image_bytes, &self.config.ocr_language)? {
            OcrOutcome::Text { text, attempts } => {
                info!("OCR found text after {} attempt(s)", attempts.len());
                let result = self.translate(&text, source, target).await?;
                Ok(Some(result))
            }
            OcrOutcome::NoTextFound { attempts } => {
                info!("OCR found no text after {} attempt(s)", attempts.len());
                Ok(None)
            }
        }
    }

    /// Transcribe an audio upload, then translate it
    pub async fn translate_audio(
        &self,
        audio_bytes: &[u8],
        extension: &str,
        source: &str,
        target: &str,
    ) -> Result<Option<TranslationResult>, AppError> {
        let Some(transcription) = &self.transcription else {
            return Err(AppError::Unknown("no speech engine configured".to_string()));
        };

        match transcription.transcribe_bytes(audio_bytes, extension).await? {
            TranscriptOutcome::Text(text) => {
                let result = self.translate(&text, source, target).await?;
                Ok(Some(result))
            }
            TranscriptOutcome::NoSpeech => Ok(None),
        }
    }
}

/// Builder wiring engine collaborators into a controller
pub struct ControllerBuilder {
    config: Config,
    model_provider: Option<Arc<dyn ModelProvider>>,
    ocr_engine: Option<Arc<dyn OcrEngine>>,
    speech_engine: Option<Arc<dyn SpeechEngine>>,
    history: Option<Arc<dyn HistorySink>>,
}

impl ControllerBuilder {
    /// Inject the neural model provider
    pub fn model_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.model_provider = Some(provider);
        self
    }

    /// Inject the OCR engine
    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }

    /// Inject the speech-to-text engine
    pub fn speech_engine(mut self, engine: Arc<dyn SpeechEngine>) -> Self {
        self.speech_engine = Some(engine);
        self
    }

    /// Override the history sink (defaults follow `history_enabled`)
    pub fn history_sink(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// Assemble the controller
    pub fn build(self) -> Result<Controller> {
        let detector = Arc::new(LanguageDetector::new(
            Arc::new(WhatlangDetector),
            self.config.approximations(),
        ));

        let neural = match (self.config.neural.enabled, self.model_provider) {
            (true, Some(provider)) => Some(Arc::new(NeuralBackend::new(provider, detector))),
            (true, None) => {
                warn!("Neural backend enabled but no model provider injected; skipping");
                None
            }
            (false, _) => None,
        };

        let mut dispatcher = Dispatcher::new();
        if let Some(neural) = &neural {
            dispatcher = dispatcher.with_neural(neural.clone() as Arc<dyn TranslationBackend>);
        }
        if self.config.cloud.enabled {
            let api_key = (!self.config.cloud.api_key.is_empty()).then(|| self.config.cloud.api_key.clone());
            let cloud: Arc<dyn TranslationBackend> =
                Arc::new(CloudBackend::new(self.config.cloud.endpoint.clone(), api_key));
            dispatcher = dispatcher.with_cloud(cloud);
        }

        let history: Arc<dyn HistorySink> = if self.config.history_enabled {
            match self.history {
                Some(sink) => sink,
                None => match SqliteHistorySink::open_default() {
                    Ok(sink) => Arc::new(sink),
                    Err(e) => {
                        warn!("History disabled, could not open store: {}", e);
                        Arc::new(NullHistorySink)
                    }
                },
            }
        } else {
            Arc::new(NullHistorySink)
        };
        dispatcher = dispatcher.with_history(history);

        let ocr = self.ocr_engine.map(OcrExtractor::new);
        let transcription = self.speech_engine.map(TranscriptionAdapter::new);

        Ok(Controller {
            config: self.config,
            dispatcher,
            neural,
            ocr,
            transcription,
        })
    }
}
