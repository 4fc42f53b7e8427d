/*!
 * Language code registry and auto-detection.
 *
 * The API surface uses short UI codes (`en`, `hi`, `ka`, `ta`, `te`, `ma`,
 * `be`). Each backend family has its own native tag space: the neural backend
 * uses language+script tags (`hin_Deva`), the cloud backend plain ISO 639-1
 * codes. The registry is the only place those spaces meet; backends never
 * share tags.
 *
 * Note the UI quirks carried over from the client: `ka` is Kannada (not
 * Georgian), `ma` is Malayalam, `be` is Bengali.
 */

use std::collections::HashMap;
use std::sync::Arc;

use isolang::Language;
use whatlang::Lang;

/// Backend family owning a native tag space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFamily {
    /// Neural MT family (language+script tags)
    Neural,
    /// Cloud translator (ISO 639-1 codes)
    Cloud,
}

/// Supported short language codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageCode {
    English,
    Hindi,
    Kannada,
    Tamil,
    Telugu,
    Malayalam,
    Bengali,
}

/// One registry row: short code plus its native tag per backend family
struct RegistryRow {
    code: LanguageCode,
    short: &'static str,
    neural_tag: &'static str,
    cloud_tag: &'static str,
}

/// The static registry table. One row per supported short code; every
/// non-auto code resolves to exactly one native tag per family.
const REGISTRY: &[RegistryRow] = &[
    RegistryRow { code: LanguageCode::English, short: "en", neural_tag: "eng_Latn", cloud_tag: "en" },
    RegistryRow { code: LanguageCode::Hindi, short: "hi", neural_tag: "hin_Deva", cloud_tag: "hi" },
    RegistryRow { code: LanguageCode::Kannada, short: "ka", neural_tag: "kan_Knda", cloud_tag: "kn" },
    RegistryRow { code: LanguageCode::Tamil, short: "ta", neural_tag: "tam_Taml", cloud_tag: "ta" },
    RegistryRow { code: LanguageCode::Telugu, short: "te", neural_tag: "tel_Telu", cloud_tag: "te" },
    RegistryRow { code: LanguageCode::Malayalam, short: "ma", neural_tag: "mal_Mlym", cloud_tag: "ml" },
    RegistryRow { code: LanguageCode::Bengali, short: "be", neural_tag: "ben_Beng", cloud_tag: "bn" },
];

impl LanguageCode {
    /// All supported codes, in registry order
    pub fn all() -> impl Iterator<Item = LanguageCode> {
        REGISTRY.iter().map(|row| row.code)
    }

    /// The supported short-code list, sorted, for error messages
    pub fn supported_codes() -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = REGISTRY.iter().map(|row| row.short).collect();
        codes.sort_unstable();
        codes
    }

    fn row(self) -> &'static RegistryRow {
        REGISTRY
            .iter()
            .find(|row| row.code == self)
            .unwrap_or_else(|| unreachable!("registry row missing for {:?}", self))
    }

    /// The short UI code
    pub fn short(self) -> &'static str {
        self.row().short
    }

    /// Resolve a short code. Unregistered codes yield `None`, never a guess.
    pub fn from_short(code: &str) -> Option<LanguageCode> {
        let normalized = code.trim().to_lowercase();
        REGISTRY.iter().find(|row| row.short == normalized).map(|row| row.code)
    }

    /// The native tag for a backend family
    pub fn native_tag(self, family: BackendFamily) -> &'static str {
        let row = self.row();
        match family {
            BackendFamily::Neural => row.neural_tag,
            BackendFamily::Cloud => row.cloud_tag,
        }
    }

    /// Reverse lookup from a backend-native tag
    pub fn from_native_tag(tag: &str, family: BackendFamily) -> Option<LanguageCode> {
        REGISTRY
            .iter()
            .find(|row| match family {
                BackendFamily::Neural => row.neural_tag == tag,
                BackendFamily::Cloud => row.cloud_tag == tag,
            })
            .map(|row| row.code)
    }

    /// English display name, resolved through the ISO tables
    pub fn display_name(self) -> &'static str {
        Language::from_639_1(self.row().cloud_tag)
            .map(|lang| lang.to_name())
            .unwrap_or(self.row().short)
    }

    /// Whether this code is the pivot language for cross-lingual directions
    pub fn is_pivot(self) -> bool {
        self == LanguageCode::English
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_short(s).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported language code: {}. Supported: {}",
                s,
                Self::supported_codes().join(", ")
            )
        })
    }
}

/// The reserved short code requesting source auto-detection
pub const AUTO_CODE: &str = "auto";

/// Whether a short code is the auto-detect sentinel
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_CODE)
}

/// Result of source auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedSource {
    /// The resolved short code, always valid
    pub code: LanguageCode,
    /// True when the detector label had no exact counterpart and was
    /// collapsed through the approximation table (lossy)
    pub approximate: bool,
}

/// Best-effort language detection collaborator.
///
/// Implementations must not fail for arbitrary text; when detection is
/// impossible they return a default label.
pub trait DetectProvider: Send + Sync {
    /// Detect a language label (ISO 639-1-ish) for the given text
    fn detect(&self, text: &str) -> String;
}

/// Statistical language detector backed by whatlang.
///
/// Distinguishes languages sharing a script (Hindi vs. Marathi in
/// Devanagari), so labels with no exact registry counterpart reach the
/// approximation table instead of being absorbed by a script-level guess.
/// Labels are ISO 639-1 for languages the registry or the default
/// approximation table knows; anything else keeps whatlang's own code and
/// falls through to the detector default downstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl DetectProvider for WhatlangDetector {
    fn detect(&self, text: &str) -> String {
        let Some(info) = whatlang::detect(text) else {
            return "en".to_string();
        };
        match info.lang() {
            Lang::Eng => "en",
            Lang::Hin => "hi",
            Lang::Ben => "bn",
            Lang::Tam => "ta",
            Lang::Tel => "te",
            Lang::Kan => "kn",
            Lang::Mal => "ml",
            Lang::Mar => "mr",
            Lang::Guj => "gu",
            Lang::Pan => "pa",
            Lang::Ori => "or",
            other => other.code(),
        }
        .to_string()
    }
}

/// Default approximation table: regional detector labels with no exact
/// counterpart collapse to the Devanagari-family fallback. This is a
/// deliberate lossy substitution, flagged as approximate in the result.
pub fn default_approximations() -> HashMap<String, LanguageCode> {
    let mut map = HashMap::new();
    for label in ["mr", "gu", "pa", "or", "sa"] {
        map.insert(label.to_string(), LanguageCode::Hindi);
    }
    map
}

/// Maps detector labels into the short-code space.
///
/// Guaranteed to return a valid short code: exact labels resolve through the
/// registry, unmapped labels go through the (configurable) approximation
/// table, and anything else falls back to English.
pub struct LanguageDetector {
    provider: Arc<dyn DetectProvider>,
    approximations: HashMap<String, LanguageCode>,
}

impl LanguageDetector {
    /// Create a detector with the given provider and approximation table
    pub fn new(provider: Arc<dyn DetectProvider>, approximations: HashMap<String, LanguageCode>) -> Self {
        Self { provider, approximations }
    }

    /// Create a detector with the whatlang provider and default table
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(WhatlangDetector), default_approximations())
    }

    /// Detect the source language of a text, always yielding a valid code
    pub fn detect(&self, text: &str) -> DetectedSource {
        let label = self.provider.detect(text);

        // Detector labels use the cloud (ISO 639-1) tag space
        if let Some(code) = LanguageCode::from_native_tag(&label, BackendFamily::Cloud) {
            return DetectedSource { code, approximate: false };
        }

        if let Some(&code) = self.approximations.get(&label) {
            return DetectedSource { code, approximate: true };
        }

        DetectedSource { code: LanguageCode::English, approximate: true }
    }
}
