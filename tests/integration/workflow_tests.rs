/*!
 * End-to-end workflow tests: configuration through the controller down to
 * mocked engines, with no real model, OCR binary or network service.
 */

use std::time::Duration;

use echopath::app_config::Config;
use echopath::app_controller::Controller;
use echopath::backends::BackendKind;
use echopath::errors::AppError;

use crate::common::create_test_image_bytes;
use crate::common::mock_engines::{
    MemoryHistorySink, MockModelProvider, MockOcrEngine, MockSpeechEngine,
};

fn offline_config() -> Config {
    let mut config = Config::default();
    // No network in tests
    config.cloud.enabled = false;
    config
}

#[tokio::test]
async fn test_controller_translate_shouldRunNeuralEndToEnd() {
    let provider = MockModelProvider::new("नमस्ते");
    let sink = MemoryHistorySink::new();

    let controller = Controller::builder(offline_config())
        .model_provider(provider)
        .history_sink(sink.clone())
        .build()
        .unwrap();

    let result = controller.translate("hello", "en", "hi").await.unwrap();

    assert_eq!(result.translated_text, "नमस्ते");
    assert_eq!(result.backend, Some(BackendKind::Neural));
    assert_eq!(result.romanized_text.as_deref(), Some("namaste"));
    assert!(!result.degraded);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn test_controller_warmup_shouldPreloadAllDirections() {
    let provider = MockModelProvider::new("text");
    let mut config = offline_config();
    config.neural.preload = true;

    let controller = Controller::builder(config)
        .model_provider(provider.clone())
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    controller.warmup().await.unwrap();
    assert_eq!(provider.loads(), 3);
}

#[test]
fn test_controller_withNeuralDisabled_shouldHaveNoBackend() {
    let mut config = offline_config();
    config.neural.enabled = false;

    let err = tokio_test::block_on(async {
        let controller = Controller::builder(config)
            .model_provider(MockModelProvider::new("never"))
            .history_sink(MemoryHistorySink::new())
            .build()
            .unwrap();
        controller.translate("hello", "en", "hi").await
    })
    .unwrap_err();
    assert!(err.to_string().contains("No translation backend available"));
}

#[tokio::test]
async fn test_controller_translate_image_shouldChainOcrIntoTranslation() {
    let provider = MockModelProvider::new("अनुवादित");
    let ocr = MockOcrEngine::new(vec!["text in the image"]);

    let controller = Controller::builder(offline_config())
        .model_provider(provider)
        .ocr_engine(ocr.clone())
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let result = controller
        .translate_image(&create_test_image_bytes(), "en", "hi")
        .await
        .unwrap()
        .expect("OCR text should translate");

    assert_eq!(result.translated_text, "अनुवादित");
    assert_eq!(ocr.calls().len(), 1);
}

#[tokio::test]
async fn test_controller_translate_image_withNoText_shouldReturnNone() {
    let ocr = MockOcrEngine::new(vec!["", "", "", ""]);

    let controller = Controller::builder(offline_config())
        .model_provider(MockModelProvider::new("never"))
        .ocr_engine(ocr.clone())
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let outcome = controller
        .translate_image(&create_test_image_bytes(), "en", "hi")
        .await
        .unwrap();

    assert!(outcome.is_none());
    // Every strategy ran before giving up
    assert_eq!(ocr.calls().len(), 4);
}

#[tokio::test]
async fn test_controller_translate_image_withoutOcrEngine_shouldFail() {
    let controller = Controller::builder(offline_config())
        .model_provider(MockModelProvider::new("never"))
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let err = controller
        .translate_image(&create_test_image_bytes(), "en", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unknown(_)));
}

#[tokio::test]
async fn test_controller_translate_audio_shouldChainTranscriptIntoTranslation() {
    let provider = MockModelProvider::new("ಅನುವಾದ");
    let speech = MockSpeechEngine::new("spoken words");

    let controller = Controller::builder(offline_config())
        .model_provider(provider)
        .speech_engine(speech.clone())
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let result = controller
        .translate_audio(b"fake audio", "wav", "en", "ka")
        .await
        .unwrap()
        .expect("transcript should translate");

    assert_eq!(result.translated_text, "ಅನುವಾದ");
    assert_eq!(speech.calls().len(), 1);
}

#[tokio::test]
async fn test_controller_translate_audio_withSilence_shouldReturnNone() {
    let speech = MockSpeechEngine::new("  ");

    let controller = Controller::builder(offline_config())
        .model_provider(MockModelProvider::new("never"))
        .speech_engine(speech)
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let outcome = controller
        .translate_audio(b"fake audio", "wav", "en", "hi")
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_controller_autoSource_shouldDetectScriptEndToEnd() {
    let provider = MockModelProvider::new("hello");

    let controller = Controller::builder(offline_config())
        .model_provider(provider)
        .history_sink(MemoryHistorySink::new())
        .build()
        .unwrap();

    let result = controller
        .translate("ಕನ್ನಡ ಕರ್ನಾಟಕದ ಅಧಿಕೃತ ಭಾಷೆಯಾಗಿದೆ", "auto", "en")
        .await
        .unwrap();
    assert_eq!(result.source_tag, "kan_Knda");
    assert_eq!(result.translated_text, "hello");
}
