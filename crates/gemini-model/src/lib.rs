//! A generation provider for the Gemini `generateContent` REST API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use lead_machine_model::{
    Candidate, ErrorKind, Generation, GenerationProvider,
    GenerationProviderError, GenerationRequest,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{DEFAULT_BASE_URL, GeminiConfig, GeminiConfigBuilder};
use proto::GenerateContentResponse;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl GenerationProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
///
/// One provider serves every candidate; the `(api_version, model_id)` pair
/// only selects the endpoint.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a new `GeminiProvider` that shares an existing HTTP client.
    #[inline]
    pub fn with_client(client: Client, config: GeminiConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    fn endpoint(&self, candidate: &Candidate) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.config.base_url, candidate.api_version, candidate.model_id
        )
    }
}

impl GenerationProvider for GeminiProvider {
    type Error = Error;

    fn generate(
        &self,
        candidate: &Candidate,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<Generation, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(self.endpoint(candidate))
            .header(API_KEY_HEADER, req.api_key.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&gemini_req)
            .send();

        async move {
            let resp = resp_fut.await.map_err(transport_error)?;
            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = resp.text().await.map_err(transport_error)?;
            trace!("got response: status={status}, body={body}");

            if !status.is_success() {
                return Err(status_error(status, &body));
            }

            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("unexpected content type: {content_type:?}"),
                    ErrorKind::MalformedResponse,
                ));
            }

            let resp = serde_json::from_str::<GenerateContentResponse>(&body)
                .map_err(|err| {
                    Error::new(
                        format!("malformed response: {err}"),
                        ErrorKind::MalformedResponse,
                    )
                })?;
            match proto::extract_text(&resp) {
                Some(text) => Ok(Generation {
                    text: text.to_owned(),
                }),
                None => Err(missing_text_error(&resp)),
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Other
    };
    Error::new(format!("{err}"), kind)
}

fn status_error(status: StatusCode, body: &str) -> Error {
    let code_in_body = serde_json::from_str::<GenerateContentResponse>(body)
        .ok()
        .and_then(|resp| resp.error)
        .and_then(|err| err.code);
    let kind = if status == StatusCode::TOO_MANY_REQUESTS
        || code_in_body == Some(StatusCode::TOO_MANY_REQUESTS.as_u16())
    {
        ErrorKind::RateLimitExceeded
    } else {
        ErrorKind::Other
    };
    let message = proto::error_message(body).unwrap_or_else(|| {
        status.canonical_reason().unwrap_or("no response body").to_owned()
    });
    Error::new(format!("HTTP {}: {message}", status.as_u16()), kind)
}

// The status was a success, but there is nothing to hand back.
fn missing_text_error(resp: &GenerateContentResponse) -> Error {
    if let Some(err) = &resp.error {
        let kind = if err.code == Some(StatusCode::TOO_MANY_REQUESTS.as_u16()) {
            ErrorKind::RateLimitExceeded
        } else {
            ErrorKind::Other
        };
        return Error::new(proto::describe_api_error(err), kind);
    }
    let block_reason = resp
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref());
    if let Some(reason) = block_reason {
        return Error::new(
            format!("prompt blocked: {reason}"),
            ErrorKind::Moderated,
        );
    }
    let finish_reason = resp
        .candidates
        .as_ref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.finish_reason.as_deref());
    let mut message = "malformed response: no text at \
                       candidates[0].content.parts[0].text"
        .to_owned();
    if let Some(reason) = finish_reason {
        message.push_str(&format!(" (finish reason: {reason})"));
    }
    Error::new(message, ErrorKind::MalformedResponse)
}
