use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use lead_machine_core::{DispatchError, DispatchOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

/// `GET` reports liveness, `POST` dispatches the message.
pub(crate) async fn chat(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    match method {
        Method::GET => Json(json!({ "status": "alive" })).into_response(),
        Method::POST => match reply(&state, &body).await {
            Ok(response) => Json(response).into_response(),
            Err(err) => err.into_response(),
        },
        _ => (StatusCode::METHOD_NOT_ALLOWED, "Not Allowed").into_response(),
    }
}

async fn reply(
    state: &AppState,
    body: &[u8],
) -> Result<ChatResponse, ApiError> {
    let request: ChatRequest = serde_json::from_slice(body)
        .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
    let prompt = request.message.unwrap_or_default();

    let outcome = state
        .dispatcher
        .dispatch(&prompt, state.api_key.as_deref())
        .await
        .map_err(|err| match err {
            DispatchError::MissingCredential => ApiError::MissingApiKey,
        })?;

    match outcome {
        DispatchOutcome::Success { text, .. } => {
            Ok(ChatResponse { response: text })
        }
        outcome @ DispatchOutcome::AllFailed(_) => {
            let details = outcome.diagnostics().join("; ");
            if outcome.is_rate_limited() {
                Err(ApiError::RateLimited { details })
            } else {
                Err(ApiError::AllCandidatesFailed { details })
            }
        }
    }
}
