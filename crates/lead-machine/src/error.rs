use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lead_machine_leads::LeadError;
use serde::Serialize;

/// Errors answered by the HTTP handlers.
///
/// Every variant renders as a JSON object with an `error` message, plus
/// `details` when the failure has a diagnostic trail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No generation API key is configured.
    #[error("Falta GEMINI_API_KEY")]
    MissingApiKey,
    /// The request body could not be read.
    #[error("Solicitud inválida: {0}")]
    InvalidBody(String),
    /// Every candidate failed and at least one hit a quota or rate limit.
    #[error("Se agotó la cuota del modelo, inténtalo más tarde")]
    RateLimited {
        /// Per-candidate diagnostics.
        details: String,
    },
    /// Every candidate failed.
    #[error("No se pudo conectar con ningún modelo")]
    AllCandidatesFailed {
        /// Per-candidate diagnostics.
        details: String,
    },
    /// No database is configured.
    #[error("database is not configured")]
    DatabaseUnavailable,
    /// A leads operation failed.
    #[error(transparent)]
    Lead(#[from] LeadError),
}

impl ApiError {
    /// Returns the status code the error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey
            | ApiError::InvalidBody(_)
            | ApiError::AllCandidatesFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Lead(LeadError::Invalid(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lead(LeadError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Lead(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            ApiError::RateLimited { details }
            | ApiError::AllCandidatesFailed { details } => Some(details),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("answering {status}: {self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}
