/*!
 * Tests for the error types
 */

use echopath::errors::{AppError, OcrError, TranscribeError, TranslateError};

#[test]
fn test_unsupported_error_shouldListSupportedCodes() {
    let err = TranslateError::unsupported("fr", "de");
    let message = err.to_string();
    assert!(message.contains("src=fr"), "got: {}", message);
    assert!(message.contains("tgt=de"), "got: {}", message);
    assert!(message.contains("be, en, hi, ka, ma, ta, te"), "got: {}", message);
}

#[test]
fn test_no_backend_error_shouldListSupportedCodes() {
    let message = TranslateError::no_backend().to_string();
    assert!(message.contains("No translation backend available"));
    assert!(message.contains("en"));
}

#[test]
fn test_generation_error_shouldCarryMessage() {
    let err = TranslateError::GenerationFailed("beam search fell over".to_string());
    assert!(err.to_string().contains("beam search fell over"));
}

#[test]
fn test_app_error_shouldWrapTranslateError() {
    let err: AppError = TranslateError::no_backend().into();
    assert!(matches!(err, AppError::Translation(_)));
    assert!(err.to_string().contains("Translation error"));
}

#[test]
fn test_app_error_shouldWrapOcrError() {
    let err: AppError = OcrError::InvalidImage("truncated png".to_string()).into();
    assert!(matches!(err, AppError::Ocr(_)));
    assert!(err.to_string().contains("truncated png"));
}

#[test]
fn test_app_error_shouldWrapTranscribeError() {
    let err: AppError = TranscribeError::EngineFailed("bad wav".to_string()).into();
    assert!(matches!(err, AppError::Transcription(_)));
}

#[test]
fn test_app_error_fromIo_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AppError = io.into();
    assert!(matches!(err, AppError::File(_)));
}

#[test]
fn test_app_error_fromAnyhow_shouldBecomeUnknown() {
    let err: AppError = anyhow::anyhow!("mystery").into();
    assert!(matches!(err, AppError::Unknown(_)));
    assert!(err.to_string().contains("mystery"));
}
