/*!
 * Tests for the language code registry and source auto-detection
 */

use std::collections::HashMap;
use std::sync::Arc;

use echopath::language::{
    default_approximations, is_auto, BackendFamily, DetectProvider, LanguageCode, LanguageDetector,
    WhatlangDetector,
};

#[test]
fn test_from_short_withSupportedCodes_shouldResolveAll() {
    assert_eq!(LanguageCode::from_short("en"), Some(LanguageCode::English));
    assert_eq!(LanguageCode::from_short("hi"), Some(LanguageCode::Hindi));
    assert_eq!(LanguageCode::from_short("ka"), Some(LanguageCode::Kannada));
    assert_eq!(LanguageCode::from_short("ta"), Some(LanguageCode::Tamil));
    assert_eq!(LanguageCode::from_short("te"), Some(LanguageCode::Telugu));
    assert_eq!(LanguageCode::from_short("ma"), Some(LanguageCode::Malayalam));
    assert_eq!(LanguageCode::from_short("be"), Some(LanguageCode::Bengali));
}

#[test]
fn test_from_short_withWhitespaceAndCase_shouldNormalize() {
    assert_eq!(LanguageCode::from_short(" HI "), Some(LanguageCode::Hindi));
    assert_eq!(LanguageCode::from_short("En"), Some(LanguageCode::English));
}

#[test]
fn test_from_short_withUnregisteredCode_shouldNotGuess() {
    // Valid ISO codes that are not in the registry must not resolve
    assert_eq!(LanguageCode::from_short("fr"), None);
    assert_eq!(LanguageCode::from_short("mr"), None);
    assert_eq!(LanguageCode::from_short("kn"), None);
}

#[test]
fn test_native_tags_shouldDifferPerFamily() {
    let code = LanguageCode::Kannada;
    assert_eq!(code.native_tag(BackendFamily::Neural), "kan_Knda");
    assert_eq!(code.native_tag(BackendFamily::Cloud), "kn");
}

#[test]
fn test_supported_codes_shouldBeSortedAndComplete() {
    let codes = LanguageCode::supported_codes();
    assert_eq!(codes, vec!["be", "en", "hi", "ka", "ma", "ta", "te"]);
}

#[test]
fn test_is_auto_shouldMatchCaseInsensitively() {
    assert!(is_auto("auto"));
    assert!(is_auto(" AUTO "));
    assert!(!is_auto("en"));
    assert!(!is_auto(""));
}

#[test]
fn test_display_name_shouldUseIsoTables() {
    assert_eq!(LanguageCode::Hindi.display_name(), "Hindi");
    assert_eq!(LanguageCode::Malayalam.display_name(), "Malayalam");
}

#[test]
fn test_whatlang_detector_withHindiText_shouldLabelHindi() {
    let detector = WhatlangDetector;
    assert_eq!(detector.detect("यह एक बहुत अच्छी किताब है और मुझे यह बहुत पसंद है"), "hi");
}

#[test]
fn test_whatlang_detector_withMarathiText_shouldLabelMarathi() {
    // Same script as Hindi; the statistical model must tell them apart
    let detector = WhatlangDetector;
    assert_eq!(
        detector.detect("मराठी ही महाराष्ट्राची अधिकृत भाषा आहे आणि ती खूप सुंदर आहे"),
        "mr"
    );
}

#[test]
fn test_whatlang_detector_withEmptyText_shouldDefaultToEnglish() {
    let detector = WhatlangDetector;
    assert_eq!(detector.detect(""), "en");
}

#[test]
fn test_detect_withKannadaText_shouldBeExact() {
    let detector = LanguageDetector::with_defaults();
    let detected = detector.detect("ಕನ್ನಡ ಕರ್ನಾಟಕದ ಅಧಿಕೃತ ಭಾಷೆಯಾಗಿದೆ");
    assert_eq!(detected.code, LanguageCode::Kannada);
    assert!(!detected.approximate);
}

#[test]
fn test_detect_withMarathiText_shouldApproximateToHindi() {
    // Devanagari text in an unregistered language collapses through the
    // approximation table and must be flagged lossy, never exact
    let detector = LanguageDetector::with_defaults();
    let detected = detector.detect("मराठी ही महाराष्ट्राची अधिकृत भाषा आहे आणि ती खूप सुंदर आहे");
    assert_eq!(detected.code, LanguageCode::Hindi);
    assert!(detected.approximate);
}

#[test]
fn test_detect_withGujaratiText_shouldApproximateToHindi() {
    let detector = LanguageDetector::with_defaults();
    let detected = detector.detect("ગુજરાતી ભારત દેશના ગુજરાત રાજ્યની ભાષા છે");
    assert_eq!(detected.code, LanguageCode::Hindi);
    assert!(detected.approximate);
}

#[test]
fn test_detect_withEmptyApproximationTable_shouldFallBackToEnglish() {
    let detector = LanguageDetector::new(Arc::new(WhatlangDetector), HashMap::new());
    let detected = detector.detect("ગુજરાતી ભારત દેશના ગુજરાત રાજ્યની ભાષા છે");
    assert_eq!(detected.code, LanguageCode::English);
    assert!(detected.approximate);
}

#[test]
fn test_detect_withCustomProvider_shouldUseItsLabel() {
    struct AlwaysBengali;
    impl DetectProvider for AlwaysBengali {
        fn detect(&self, _text: &str) -> String {
            "bn".to_string()
        }
    }

    let detector = LanguageDetector::new(Arc::new(AlwaysBengali), default_approximations());
    let detected = detector.detect("whatever");
    assert_eq!(detected.code, LanguageCode::Bengali);
    assert!(!detected.approximate);
}

#[test]
fn test_default_approximations_shouldCollapseToHindi() {
    let table = default_approximations();
    for label in ["mr", "gu", "pa", "or", "sa"] {
        assert_eq!(table.get(label), Some(&LanguageCode::Hindi), "missing {}", label);
    }
}
