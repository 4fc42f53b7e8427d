/*!
 * OCR multi-pass extraction pipeline.
 *
 * The OCR engine itself is an opaque collaborator; this module owns the
 * retry state machine around it. Strategies (a page-segmentation mode plus
 * optional binarization) run in a fixed order until one yields non-empty
 * text. Exhausting every strategy is a distinguished "no text found"
 * outcome, not an error; the caller decides whether that is terminal.
 *
 * General preprocessing (grayscale, upscaling small images, sharpening,
 * contrast) happens once before the loop, unconditionally.
 */

use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;
use std::sync::Arc;

use crate::errors::OcrError;

/// Upscale images whose largest side is below this before recognition
const MIN_OCR_DIMENSION: u32 = 1000;

/// Binarization cutoff for the thresholded strategy
const BINARY_THRESHOLD: u8 = 128;

/// Page segmentation mode passed through to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    /// Assume a single uniform block of text
    SingleBlock,
    /// Fully automatic page segmentation
    Auto,
    /// Sparse text, find as much text as possible in no particular order
    SparseText,
}

impl PageSegMode {
    /// The engine's numeric mode value
    pub fn engine_value(self) -> u32 {
        match self {
            PageSegMode::SingleBlock => 6,
            PageSegMode::Auto => 3,
            PageSegMode::SparseText => 11,
        }
    }
}

/// Engine-facing recognition config
#[derive(Debug, Clone, Copy)]
pub struct OcrConfig {
    /// Page segmentation mode
    pub page_seg_mode: PageSegMode,
}

/// One extraction strategy: a segmentation mode plus optional binarization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrStrategy {
    /// Segmentation mode for this pass
    pub psm: PageSegMode,
    /// Apply a binary threshold to the prepared image first
    pub binarize: bool,
}

impl OcrStrategy {
    /// Stable identifier for attempt records and logs
    pub fn id(&self) -> &'static str {
        match (self.psm, self.binarize) {
            (PageSegMode::SingleBlock, false) => "single-block",
            (PageSegMode::Auto, false) => "auto",
            (PageSegMode::SparseText, false) => "sparse-text",
            (PageSegMode::SingleBlock, true) => "threshold-single-block",
            (PageSegMode::Auto, true) => "threshold-auto",
            (PageSegMode::SparseText, true) => "threshold-sparse-text",
        }
    }
}

/// One recorded extraction attempt
#[derive(Debug, Clone)]
pub struct OcrAttempt {
    /// Strategy identifier
    pub strategy_id: &'static str,
    /// Raw text the engine returned (possibly empty)
    pub text: String,
}

/// Outcome of the extraction pipeline
#[derive(Debug, Clone)]
pub enum OcrOutcome {
    /// A strategy produced non-empty text
    Text {
        /// The extracted text, trimmed
        text: String,
        /// Every attempt made, in order, including the winning one
        attempts: Vec<OcrAttempt>,
    },
    /// Every strategy ran and none produced text
    NoTextFound {
        /// Every attempt made, in order
        attempts: Vec<OcrAttempt>,
    },
}

impl OcrOutcome {
    /// The extracted text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            OcrOutcome::Text { text, .. } => Some(text),
            OcrOutcome::NoTextFound { .. } => None,
        }
    }

    /// Attempts made, in order
    pub fn attempts(&self) -> &[OcrAttempt] {
        match self {
            OcrOutcome::Text { attempts, .. } | OcrOutcome::NoTextFound { attempts } => attempts,
        }
    }
}

/// OCR engine collaborator. May legitimately return empty text; that is a
/// result, not an error signal.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in a prepared image
    fn recognize(&self, image: &DynamicImage, language: &str, config: &OcrConfig) -> anyhow::Result<String>;
}

/// The extraction pipeline
pub struct OcrExtractor {
    engine: Arc<dyn OcrEngine>,
    strategies: Vec<OcrStrategy>,
}

impl OcrExtractor {
    /// Create an extractor with the default strategy order
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine, strategies: Self::default_strategies() }
    }

    /// Override the strategy list (order is significant)
    pub fn with_strategies(mut self, strategies: Vec<OcrStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// The documented strategy order: uniform block, fully automatic,
    /// sparse text, then binary threshold + uniform block.
    pub fn default_strategies() -> Vec<OcrStrategy> {
        vec![
            OcrStrategy { psm: PageSegMode::SingleBlock, binarize: false },
            OcrStrategy { psm: PageSegMode::Auto, binarize: false },
            OcrStrategy { psm: PageSegMode::SparseText, binarize: false },
            OcrStrategy { psm: PageSegMode::SingleBlock, binarize: true },
        ]
    }

    /// Decode raw image bytes and extract text
    pub fn extract_bytes(&self, bytes: &[u8], language: &str) -> Result<OcrOutcome, OcrError> {
        let image = image::load_from_memory(bytes).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        self.extract(&image, language)
    }

    /// Run the strategy loop over a decoded image
    pub fn extract(&self, image: &DynamicImage, language: &str) -> Result<OcrOutcome, OcrError> {
        let prepared = prepare_image(image);
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let input = if strategy.binarize { binarize(&prepared) } else { prepared.clone() };
            let config = OcrConfig { page_seg_mode: strategy.psm };

            let raw = self
                .engine
                .recognize(&input, language, &config)
                .map_err(|e| OcrError::EngineFailed(e.to_string()))?;

            let trimmed = raw.trim();
            debug!("OCR strategy {}: {} chars", strategy.id(), trimmed.len());

            if trimmed.is_empty() {
                attempts.push(OcrAttempt { strategy_id: strategy.id(), text: raw });
                continue;
            }

            let text = trimmed.to_string();
            attempts.push(OcrAttempt { strategy_id: strategy.id(), text: raw });
            return Ok(OcrOutcome::Text { text, attempts });
        }

        Ok(OcrOutcome::NoTextFound { attempts })
    }
}

/// One-shot preprocessing applied to the whole image before the strategy
/// loop: grayscale, upscale small images, sharpen, boost contrast.
fn prepare_image(image: &DynamicImage) -> DynamicImage {
    let mut prepared = image.grayscale();

    let (w, h) = (prepared.width(), prepared.height());
    if w.max(h) < MIN_OCR_DIMENSION {
        prepared = prepared.resize(w * 2, h * 2, FilterType::Lanczos3);
    }

    prepared.unsharpen(1.0, 4).adjust_contrast(20.0)
}

/// Binary threshold over the already-grayscaled image
fn binarize(image: &DynamicImage) -> DynamicImage {
    let mut luma = image.to_luma8();
    for pixel in luma.pixels_mut() {
        pixel.0[0] = if pixel.0[0] >= BINARY_THRESHOLD { 255 } else { 0 };
    }
    DynamicImage::ImageLuma8(luma)
}
