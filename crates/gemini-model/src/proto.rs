use lead_machine_model::GenerationRequest;
use serde::{Deserialize, Serialize};

use crate::GeminiConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<ResponseCandidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub error: Option<ApiError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// The error object the API returns on failures, e.g.
/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &GenerationRequest,
    config: &GeminiConfig,
) -> GenerateContentRequest {
    let text = match &config.instruction {
        Some(instruction) => format!("{instruction}\n\n{}", req.prompt),
        None => req.prompt.clone(),
    };
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: Some(text) }],
        }],
    }
}

/// Walks `candidates[0].content.parts[0].text`, returning `None` if any step
/// is missing or the text is empty.
pub fn extract_text(resp: &GenerateContentResponse) -> Option<&str> {
    resp.candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
}

/// Pulls the most descriptive message out of an error body.
///
/// Falls back to the raw body when it is not the documented error shape.
/// Longest raw body, in characters, quoted in a diagnostic.
pub const MAX_RAW_ERROR_CHARS: usize = 200;

pub fn error_message(body: &str) -> Option<String> {
    if let Ok(resp) = serde_json::from_str::<GenerateContentResponse>(body) {
        if let Some(err) = resp.error {
            return Some(describe_api_error(&err));
        }
    }
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    // Not an API error object, e.g. a proxy's HTML page.
    let mut message: String = body.chars().take(MAX_RAW_ERROR_CHARS).collect();
    if message.len() < body.len() {
        message.push_str("...");
    }
    Some(message)
}

pub fn describe_api_error(err: &ApiError) -> String {
    match (&err.message, &err.status) {
        (Some(message), _) => message.clone(),
        (None, Some(status)) => status.clone(),
        (None, None) => match err.code {
            Some(code) => format!("error code {code}"),
            None => "unknown error".to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::GeminiConfigBuilder;

    #[test]
    fn test_create_request() {
        let req = GenerationRequest::new("key", "Hola");
        let config = GeminiConfigBuilder::new().build();
        assert_eq!(
            serde_json::to_value(create_request(&req, &config)).unwrap(),
            json!({ "contents": [{ "parts": [{ "text": "Hola" }] }] })
        );
    }

    #[test]
    fn test_create_request_with_instruction() {
        let req = GenerationRequest::new("key", "¿Qué servicios ofrecen?");
        let config = GeminiConfigBuilder::new()
            .with_instruction("Eres el asistente de ventas.")
            .build();
        assert_eq!(
            serde_json::to_value(create_request(&req, &config)).unwrap(),
            json!({ "contents": [{ "parts": [{
                "text": "Eres el asistente de ventas.\n\n¿Qué servicios ofrecen?"
            }] }] })
        );
    }

    #[test]
    fn test_extract_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hola, ¿en qué puedo ayudarte?" }], "role": "model" },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&resp), Some("Hola, ¿en qué puedo ayudarte?"));
    }

    #[test]
    fn test_extract_text_missing_steps() {
        let shapes = [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
        ];
        for shape in shapes {
            let resp: GenerateContentResponse =
                serde_json::from_value(shape.clone()).unwrap();
            assert_eq!(extract_text(&resp), None, "shape: {shape}");
        }
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("quota exceeded"));
        assert_eq!(
            error_message(r#"{"error":{"status":"UNAVAILABLE"}}"#).as_deref(),
            Some("UNAVAILABLE")
        );
        assert_eq!(
            error_message("upstream down").as_deref(),
            Some("upstream down")
        );
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn test_error_message_truncates_raw_body() {
        let page = format!("<html>{}</html>", "ñ".repeat(500));
        let message = error_message(&page).unwrap();
        assert_eq!(message.chars().count(), MAX_RAW_ERROR_CHARS + 3);
        assert!(message.starts_with("<html>ñ"));
        assert!(message.ends_with("..."));

        let short = "x".repeat(MAX_RAW_ERROR_CHARS);
        assert_eq!(error_message(&short), Some(short));
    }
}
