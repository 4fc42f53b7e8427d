/*!
 * Tests for the cloud backend adapter (offline paths only; request/response
 * handling against a live service is out of scope here)
 */

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use echopath::backends::cloud::CloudBackend;
use echopath::backends::{BackendKind, TranslationBackend};
use echopath::errors::TranslateError;
use echopath::language::LanguageCode;

/// Serves one canned HTTP response on a loopback socket and returns the
/// endpoint URL
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

#[test]
fn test_kind_shouldBeCloud() {
    let backend = CloudBackend::new("http://localhost:5000", None);
    assert_eq!(backend.kind(), BackendKind::Cloud);
}

#[tokio::test]
async fn test_translate_withEmptyText_shouldShortCircuitWithoutRequest() {
    // Unroutable endpoint: any network attempt would fail loudly
    let backend = CloudBackend::new("http://127.0.0.1:1", None);

    let translation = backend.translate("   ", "en", "hi").await.unwrap();
    assert_eq!(translation.text, "");
}

#[tokio::test]
async fn test_translate_withInvalidSourceCode_shouldFailBeforeRequest() {
    let backend = CloudBackend::new("http://127.0.0.1:1", None);

    // Not registered and not ISO 639-1, so resolution fails locally
    let err = backend.translate("hello", "zz", "en").await.unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedLanguage { .. }));
}

#[tokio::test]
async fn test_translate_withInvalidTargetCode_shouldFailBeforeRequest() {
    let backend = CloudBackend::new("http://127.0.0.1:1", None);

    let err = backend.translate("hello", "en", "klingon").await.unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedLanguage { .. }));
}

#[tokio::test]
async fn test_translate_withUnreachableService_shouldReportGenerationFailed() {
    let backend = CloudBackend::new("http://127.0.0.1:1", None);

    // Codes resolve fine; the request itself fails
    let err = backend.translate("hello", "en", "fr").await.unwrap_err();
    assert!(matches!(err, TranslateError::GenerationFailed(_)));
}

#[tokio::test]
async fn test_translate_withValidResponse_shouldParseTranslatedText() {
    let endpoint = serve_once("HTTP/1.1 200 OK", r#"{"translatedText":"नमस्ते"}"#).await;
    let backend = CloudBackend::new(endpoint, None);

    let translation = backend.translate("hello", "en", "hi").await.unwrap();

    assert_eq!(translation.text, "नमस्ते");
    assert_eq!(translation.source_tag, "en");
    assert_eq!(translation.target_tag, "hi");
    assert_eq!(translation.detected_source, None);
}

#[tokio::test]
async fn test_translate_withAutoSource_shouldReportDetectedTag() {
    let endpoint = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"translatedText":"hello","detectedLanguage":{"language":"hi","confidence":0.92}}"#,
    )
    .await;
    let backend = CloudBackend::new(endpoint, None);

    let translation = backend.translate("नमस्ते", "auto", "en").await.unwrap();

    assert_eq!(translation.text, "hello");
    assert_eq!(translation.source_tag, "hi");
    assert_eq!(translation.detected_source, Some(LanguageCode::Hindi));
}

#[tokio::test]
async fn test_translate_withAutoSourceAndNoDetection_shouldNotLeakSentinel() {
    // Some deployments omit the detection block; the "auto" sentinel must
    // not come back as if it were a resolved tag
    let endpoint = serve_once("HTTP/1.1 200 OK", r#"{"translatedText":"hello"}"#).await;
    let backend = CloudBackend::new(endpoint, None);

    let translation = backend.translate("नमस्ते", "auto", "en").await.unwrap();

    assert_eq!(translation.source_tag, "und");
    assert_eq!(translation.detected_source, None);
}

#[tokio::test]
async fn test_translate_withErrorStatus_shouldSurfaceServiceError() {
    let endpoint = serve_once("HTTP/1.1 403 Forbidden", r#"{"error":"bad api key"}"#).await;
    let backend = CloudBackend::new(endpoint, None);

    let err = backend.translate("hello", "en", "hi").await.unwrap_err();
    match err {
        TranslateError::GenerationFailed(message) => {
            assert!(message.contains("cloud service error"), "got: {}", message);
            assert!(message.contains("bad api key"), "got: {}", message);
        }
        other => panic!("expected GenerationFailed, got {:?}", other),
    }
}
