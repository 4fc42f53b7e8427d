/*!
 * Neural MT backend adapter.
 *
 * Translates between the supported short codes using three
 * direction-specific model handles (pivot-to-Indic, Indic-to-pivot,
 * Indic-to-Indic). The tokenizer/model engines themselves are opaque
 * collaborators injected through the `ModelProvider` trait; this adapter
 * owns direction selection, lazy handle caching, pre/post-processing and
 * deterministic decoding parameters.
 */

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::backends::{BackendKind, BackendTranslation, TranslationBackend};
use crate::errors::TranslateError;
use crate::language::{is_auto, BackendFamily, LanguageCode, LanguageDetector};

/// Maximum input tokens before truncation
pub const MAX_INPUT_TOKENS: usize = 512;

/// Translation direction, keyed by the pivot language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Pivot (English) to an Indic language
    EnToIndic,
    /// An Indic language to the pivot
    IndicToEn,
    /// Direct Indic to Indic
    IndicToIndic,
}

impl Direction {
    /// All three directions, for preloading
    pub const ALL: [Direction; 3] = [Direction::EnToIndic, Direction::IndicToEn, Direction::IndicToIndic];

    /// Pick the direction for a resolved code pair
    pub fn for_pair(source: LanguageCode, target: LanguageCode) -> Direction {
        match (source.is_pivot(), target.is_pivot()) {
            (true, false) => Direction::EnToIndic,
            (false, true) => Direction::IndicToEn,
            _ => Direction::IndicToIndic,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::EnToIndic => "en-indic",
            Direction::IndicToEn => "indic-en",
            Direction::IndicToIndic => "indic-indic",
        };
        write!(f, "{}", name)
    }
}

/// Deterministic decoding parameters. Beam search, never sampling, and no
/// incremental cache state carried across calls.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Beam width
    pub num_beams: usize,
    /// Maximum output length in tokens
    pub max_length: usize,
    /// Incremental KV cache; disabled so every call is stateless
    pub use_cache: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { num_beams: 5, max_length: 256, use_cache: false }
    }
}

/// A tokenized input. The attention mask is optional because some tokenizers
/// do not supply one; the adapter synthesizes an all-ones mask in that case.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// Token ids, truncated at the encode limit
    pub input_ids: Vec<u32>,
    /// Attention mask matching `input_ids`, when the tokenizer provides one
    pub attention_mask: Option<Vec<u32>>,
}

/// Tokenizer half of a model handle
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids, truncating at `max_length`
    fn encode(&self, text: &str, max_length: usize) -> anyhow::Result<Encoding>;

    /// Decode generated token ids back into text, skipping special tokens
    fn decode(&self, ids: &[u32]) -> anyhow::Result<String>;
}

/// Generation half of a model handle
pub trait Generator: Send + Sync {
    /// Run beam-search generation over one encoded input
    fn generate(
        &self,
        input_ids: &[u32],
        attention_mask: &[u32],
        params: &GenerationParams,
    ) -> anyhow::Result<Vec<u32>>;
}

/// A loaded tokenizer + model pair for one direction
pub struct ModelPair {
    /// The tokenizer
    pub tokenizer: Box<dyn Tokenizer>,
    /// The generation model
    pub generator: Box<dyn Generator>,
}

impl Debug for ModelPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPair").finish_non_exhaustive()
    }
}

/// Model handle provider collaborator.
///
/// `load` is idempotent and may be slow; the adapter guarantees it is called
/// at most once per direction for the process lifetime.
#[async_trait]
pub trait ModelProvider: Send + Sync + Debug {
    /// Load the tokenizer + model pair for a direction
    async fn load(&self, direction: Direction) -> anyhow::Result<ModelPair>;
}

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,.;:!?।])").expect("static regex"));

/// Text pre/post-processing for the neural tag space.
///
/// The model family expects inputs prefixed with the resolved tag pair and
/// produces outputs that may carry tag tokens and detokenization artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagProcessor;

impl TagProcessor {
    /// Build the model input for a tag pair
    pub fn preprocess(&self, text: &str, source_tag: &str, target_tag: &str) -> String {
        let normalized = MULTI_SPACE.replace_all(text.trim(), " ");
        format!("{} {} {}", source_tag, target_tag, normalized)
    }

    /// Clean a decoded hypothesis for a target tag
    pub fn postprocess(&self, decoded: &str, target_tag: &str) -> String {
        let mut text = decoded.trim();
        // Strip an echoed tag token
        if let Some(stripped) = text.strip_prefix(target_tag) {
            text = stripped.trim_start();
        }
        SPACE_BEFORE_PUNCT.replace_all(text, "$1").into_owned()
    }
}

/// Neural MT backend with lazily-built, process-lifetime model handles.
///
/// Handle construction is serialized per direction: concurrent first-use
/// races go through a `OnceCell`, so each pair loads exactly once.
pub struct NeuralBackend {
    provider: Arc<dyn ModelProvider>,
    handles: HashMap<Direction, OnceCell<Arc<ModelPair>>>,
    detector: Arc<LanguageDetector>,
    processor: TagProcessor,
    params: GenerationParams,
}

impl Debug for NeuralBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuralBackend")
            .field("provider", &self.provider)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl NeuralBackend {
    /// Create a backend over a model provider and language detector
    pub fn new(provider: Arc<dyn ModelProvider>, detector: Arc<LanguageDetector>) -> Self {
        let handles = Direction::ALL.iter().map(|&d| (d, OnceCell::new())).collect();
        Self {
            provider,
            handles,
            detector,
            processor: TagProcessor,
            params: GenerationParams::default(),
        }
    }

    /// Override the decoding parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Get or build the handle for a direction. First-call latency is
    /// expected to be high; use `preload` to warm all handles at startup.
    async fn handle(&self, direction: Direction) -> Result<Arc<ModelPair>, TranslateError> {
        let cell = self
            .handles
            .get(&direction)
            .unwrap_or_else(|| unreachable!("handle cell missing for {}", direction));

        let pair = cell
            .get_or_try_init(|| async {
                info!("Loading model pair for direction {}", direction);
                self.provider
                    .load(direction)
                    .await
                    .map(Arc::new)
                    .map_err(|e| TranslateError::GenerationFailed(format!("model load failed for {}: {}", direction, e)))
            })
            .await?;

        Ok(Arc::clone(pair))
    }

    /// Eagerly load all three model handles
    pub async fn preload(&self) -> Result<(), TranslateError> {
        try_join_all(Direction::ALL.iter().map(|&d| self.handle(d))).await?;
        info!("All model handles loaded");
        Ok(())
    }

    /// Resolve an auto source to a concrete code; concrete codes must be
    /// registered, never guessed at
    fn resolve_source(&self, text: &str, source: &str, target: &str) -> Result<(LanguageCode, bool), TranslateError> {
        if is_auto(source) {
            let detected = self.detector.detect(text);
            if detected.approximate {
                warn!("Source detection fell back to approximate code {}", detected.code);
            }
            return Ok((detected.code, true));
        }

        LanguageCode::from_short(source)
            .map(|code| (code, false))
            .ok_or_else(|| TranslateError::unsupported(source, target))
    }
}

#[async_trait]
impl TranslationBackend for NeuralBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Neural
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<BackendTranslation, TranslateError> {
        if text.trim().is_empty() {
            return Ok(BackendTranslation {
                text: String::new(),
                source_tag: String::new(),
                target_tag: String::new(),
                detected_source: None,
            });
        }

        let (source_code, was_auto) = self.resolve_source(text, source, target)?;
        let target_code = LanguageCode::from_short(target)
            .ok_or_else(|| TranslateError::unsupported(source, target))?;

        let source_tag = source_code.native_tag(BackendFamily::Neural);
        let target_tag = target_code.native_tag(BackendFamily::Neural);

        let direction = Direction::for_pair(source_code, target_code);
        let pair = self.handle(direction).await?;

        let model_input = self.processor.preprocess(text, source_tag, target_tag);
        debug!("Neural input ({}): {} chars", direction, model_input.len());

        let params = self.params;
        // Tokenization and beam search are long CPU-bound calls; run them off
        // the async executor. Not cancellable mid-flight.
        let decoded = tokio::task::spawn_blocking(move || -> Result<String, TranslateError> {
            let encoding = pair
                .tokenizer
                .encode(&model_input, MAX_INPUT_TOKENS)
                .map_err(|e| TranslateError::GenerationFailed(format!("tokenization failed: {}", e)))?;

            if encoding.input_ids.is_empty() {
                return Err(TranslateError::GenerationFailed(
                    "tokenization produced empty input".to_string(),
                ));
            }

            // A mask-less tokenization is non-fatal: synthesize all-ones
            let attention_mask = encoding
                .attention_mask
                .unwrap_or_else(|| vec![1; encoding.input_ids.len()]);

            let output_ids = pair
                .generator
                .generate(&encoding.input_ids, &attention_mask, &params)
                .map_err(|e| TranslateError::GenerationFailed(e.to_string()))?;

            pair.tokenizer
                .decode(&output_ids)
                .map_err(|e| TranslateError::GenerationFailed(format!("decoding failed: {}", e)))
        })
        .await
        .map_err(|e| TranslateError::GenerationFailed(format!("generation task failed: {}", e)))??;

        let translated = self.processor.postprocess(&decoded, target_tag);

        Ok(BackendTranslation {
            text: translated,
            source_tag: source_tag.to_string(),
            target_tag: target_tag.to_string(),
            detected_source: was_auto.then_some(source_code),
        })
    }
}
