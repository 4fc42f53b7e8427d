/*!
 * Backend adapters for the translation dispatcher.
 *
 * This module contains the capability trait all translation backends
 * implement, plus the two fixed variants:
 * - Neural: the neural MT model family (three direction-specific handles)
 * - Cloud: a third-party translation service, fallback tier only
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::TranslateError;
use crate::language::LanguageCode;

pub mod cloud;
pub mod neural;

/// Which backend produced a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Neural MT model family (primary)
    Neural,
    /// Cloud translation service (fallback)
    Cloud,
}

impl BackendKind {
    /// Human-readable backend name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Neural => "neural",
            Self::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single backend translation, tags resolved into the backend's own space
#[derive(Debug, Clone)]
pub struct BackendTranslation {
    /// Translated text
    pub text: String,
    /// Resolved source tag, in the backend's native tag space
    pub source_tag: String,
    /// Resolved target tag, in the backend's native tag space
    pub target_tag: String,
    /// Concrete source code, present when the request asked for auto-detect
    pub detected_source: Option<LanguageCode>,
}

/// Common capability trait for translation backends.
///
/// Codes arrive as short strings and each adapter resolves them against its
/// own tag space: a code the neural family rejects may still be acceptable
/// to the cloud service. Adapters classify their own failures; retry and
/// fallback policy belongs to the dispatcher, never to an adapter.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// The fixed variant this adapter implements
    fn kind(&self) -> BackendKind;

    /// Translate text between two short codes (`source` may be "auto").
    ///
    /// Empty or whitespace-only input must short-circuit to an empty
    /// translation without touching the underlying engine.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<BackendTranslation, TranslateError>;
}
