use lead_machine_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use lead_machine_model::{
    Candidate, ErrorKind, GenerationProvider, GenerationProviderError,
    GenerationRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(
        GeminiConfigBuilder::new()
            .with_base_url(server.uri())
            .build(),
    )
}

fn request() -> GenerationRequest {
    GenerationRequest::new("test-key", "Hola")
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "Hola" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hola, ¿en qué puedo ayudarte?" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generation = provider(&server)
        .generate(&Candidate::new("v1beta", "gemini-1.5-flash"), &request())
        .await
        .unwrap();
    assert_eq!(generation.text, "Hola, ¿en qué puedo ayudarte?");
}

#[tokio::test]
async fn test_quota_status_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "quota exceeded",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert_eq!(err.message(), "HTTP 429: quota exceeded");
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
    assert_eq!(err.message(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_html_error_page_is_cut_short() {
    let server = MockServer::start().await;
    let page =
        format!("<html><body>{}</body></html>", "Bad Gateway ".repeat(100));
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw(page, "text/html"),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(err.message().starts_with("HTTP 502: <html><body>Bad Gateway"));
    assert!(err.message().ends_with("..."));
    assert!(err.message().len() < 300);
}

#[tokio::test]
async fn test_success_status_without_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "MAX_TOKENS" }]
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(err.message().contains("MAX_TOKENS"));
}

#[tokio::test]
async fn test_blocked_prompt_is_moderated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Moderated);
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate(&Candidate::new("v1", "gemini-1.5-flash"), &request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}
