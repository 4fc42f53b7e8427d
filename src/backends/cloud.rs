/*!
 * Cloud translation backend adapter.
 *
 * Wraps a LibreTranslate-compatible HTTP service. Strictly less accurate
 * than the neural family but higher availability, so the dispatcher uses it
 * as the fallback tier only. Accepts ISO 639-1 tags from the cloud row of
 * the registry; on an auto source the service performs detection in the same
 * call and the detected tag is reported back.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backends::{BackendKind, BackendTranslation, TranslationBackend};
use crate::errors::TranslateError;
use crate::language::{is_auto, BackendFamily, LanguageCode};

/// Cloud translate request body
#[derive(Debug, Serialize)]
struct CloudRequest {
    /// Text to translate
    q: String,
    /// Source ISO code or "auto"
    source: String,
    /// Target ISO code
    target: String,
    /// Plain text, never HTML
    format: &'static str,
    /// API key, omitted when the service does not require one
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Detection block returned for auto-source requests
#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    /// Detected ISO code
    language: String,
    /// Detection confidence, unused but kept for diagnostics
    #[serde(default)]
    #[allow(dead_code)]
    confidence: f64,
}

/// Cloud translate response body
#[derive(Debug, Deserialize)]
struct CloudResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<DetectedLanguage>,
}

/// Client for a LibreTranslate-compatible translation service
#[derive(Debug, Clone)]
pub struct CloudBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CloudBackend {
    /// Create a new cloud backend client
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    fn translate_url(&self) -> String {
        format!("{}/translate", self.endpoint.trim_end_matches('/'))
    }

    async fn request(&self, body: &CloudRequest) -> Result<CloudResponse, TranslateError> {
        let response = self
            .client
            .post(self.translate_url())
            .json(body)
            .send()
            .await
            .map_err(|e| TranslateError::GenerationFailed(format!("cloud request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            error!("Cloud translate error ({}): {}", status, error_text);
            return Err(TranslateError::GenerationFailed(format!(
                "cloud service error ({}): {}",
                status, error_text
            )));
        }

        response
            .json::<CloudResponse>()
            .await
            .map_err(|e| TranslateError::GenerationFailed(format!("failed to parse cloud response: {}", e)))
    }

    /// Resolve a short code to the cloud tag space.
    ///
    /// Registered short codes use the registry row; anything else that is a
    /// valid ISO 639-1 code passes through directly (the service covers far
    /// more languages than the neural family). Unknown codes fail, never
    /// guess.
    fn resolve_tag(source: &str, target: &str, code: &str) -> Result<String, TranslateError> {
        if let Some(known) = LanguageCode::from_short(code) {
            return Ok(known.native_tag(BackendFamily::Cloud).to_string());
        }
        let normalized = code.trim().to_lowercase();
        if isolang::Language::from_639_1(&normalized).is_some() {
            return Ok(normalized);
        }
        Err(TranslateError::unsupported(source, target))
    }

    /// Test the connection with a trivial translation
    pub async fn test_connection(&self) -> Result<(), TranslateError> {
        let body = CloudRequest {
            q: "hello".to_string(),
            source: "en".to_string(),
            target: "hi".to_string(),
            format: "text",
            api_key: self.api_key.clone(),
        };
        self.request(&body).await?;
        Ok(())
    }
}

#[async_trait]
impl TranslationBackend for CloudBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
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

        let auto_source = is_auto(source);
        let source_tag = if auto_source {
            "auto".to_string()
        } else {
            Self::resolve_tag(source, target, source)?
        };
        let target_tag = Self::resolve_tag(source, target, target)?;

        let body = CloudRequest {
            q: text.to_string(),
            source: source_tag.clone(),
            target: target_tag.clone(),
            format: "text",
            api_key: self.api_key.clone(),
        };

        debug!("Cloud translate: {} -> {} ({} chars)", source_tag, target_tag, text.len());
        let response = self.request(&body).await?;

        // When the service detected the source, report its tag back. A
        // response without a detection block yields the undetermined tag;
        // the "auto" sentinel never leaves as a resolved tag.
        let (resolved_source_tag, detected_source) = match (auto_source, response.detected_language) {
            (true, Some(detected)) => {
                let code = LanguageCode::from_native_tag(&detected.language, BackendFamily::Cloud);
                (detected.language, code)
            }
            (true, None) => ("und".to_string(), None),
            (false, _) => (source_tag, None),
        };

        Ok(BackendTranslation {
            text: response.translated_text,
            source_tag: resolved_source_tag,
            target_tag,
            detected_source,
        })
    }
}
