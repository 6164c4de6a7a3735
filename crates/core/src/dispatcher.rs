use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use lead_machine_model::{
    Candidate, ErrorKind, Generation, GenerationProvider,
    GenerationProviderError, GenerationRequest,
};
use tokio::time::timeout;
use tracing::Instrument;

use crate::outcome::{AttemptFailure, DispatchOutcome};

/// The prompt used when the caller sends nothing.
pub const DEFAULT_PROMPT: &str = "Hola";

type AttemptResult = Result<Generation, Box<dyn GenerationProviderError>>;
type BoxedAttemptFuture = Pin<Box<dyn Future<Output = AttemptResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(Candidate, GenerationRequest) -> BoxedAttemptFuture + Send + Sync
>;

/// The ordered candidates and the per-attempt time budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Candidates, most preferred first.
    pub candidates: Vec<Candidate>,
    /// How long a single candidate may take before it counts as failed.
    pub attempt_timeout: Duration,
}

impl FallbackPolicy {
    /// Creates a new policy.
    #[inline]
    pub fn new(candidates: Vec<Candidate>, attempt_timeout: Duration) -> Self {
        Self {
            candidates,
            attempt_timeout,
        }
    }
}

/// The error returned when a dispatch cannot start at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// No API key is configured.
    MissingCredential,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MissingCredential => f.write_str("missing API key"),
        }
    }
}

impl Error for DispatchError {}

/// Tries an ordered list of candidates against a generation provider and
/// returns the first reply.
///
/// The provider type is erased, so the dispatcher can be stored in shared
/// application state without a generic parameter. Cloning is cheap and
/// clones share the same provider.
///
/// Candidates are attempted one at a time. A candidate that errors, answers
/// without text or exceeds the attempt timeout is recorded and the next one
/// is tried; no candidate is ever retried.
#[derive(Clone)]
pub struct Dispatcher {
    handler_fn: HandlerFn,
    policy: Arc<FallbackPolicy>,
}

impl Dispatcher {
    /// Creates a dispatcher over `provider` with a default policy.
    pub fn new<P: GenerationProvider + 'static>(
        provider: P,
        policy: FallbackPolicy,
    ) -> Self {
        // We have to erase the type `P`, since `Dispatcher` is shared by
        // handlers that don't know (or care) which provider is behind it.
        let handler_fn: HandlerFn = Arc::new(
            move |candidate: Candidate,
                  req: GenerationRequest|
                  -> BoxedAttemptFuture {
                let fut = provider.generate(&candidate, &req);
                Box::pin(async move {
                    fut.await.map_err(|err| {
                        Box::new(err) as Box<dyn GenerationProviderError>
                    })
                })
            },
        );
        Self {
            handler_fn,
            policy: Arc::new(policy),
        }
    }

    /// Dispatches `prompt` with the configured policy.
    #[inline]
    pub async fn dispatch(
        &self,
        prompt: &str,
        api_key: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch_with(
            prompt,
            api_key,
            &self.policy.candidates,
            self.policy.attempt_timeout,
        )
        .await
    }

    /// Dispatches `prompt` over explicit `candidates`.
    ///
    /// A blank prompt is replaced by [`DEFAULT_PROMPT`]. A missing or blank
    /// `api_key` fails before any candidate is attempted.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the in-flight
    /// attempt and no further candidates are tried.
    pub async fn dispatch_with(
        &self,
        prompt: &str,
        api_key: Option<&str>,
        candidates: &[Candidate],
        attempt_timeout: Duration,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(api_key) = api_key.map(str::trim).filter(|k| !k.is_empty())
        else {
            error!("refusing to dispatch without an API key");
            return Err(DispatchError::MissingCredential);
        };
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_PROMPT
        } else {
            prompt
        };
        let req = GenerationRequest::new(api_key, prompt);

        let mut failures = Vec::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            let span = info_span!("attempt", idx, candidate = %candidate);
            let attempt = (self.handler_fn)(candidate.clone(), req.clone());
            let failure =
                match timeout(attempt_timeout, attempt).instrument(span).await {
                    Ok(Ok(generation)) if !generation.text.trim().is_empty() => {
                        info!(
                            "candidate {candidate} answered after {} failure(s)",
                            failures.len()
                        );
                        return Ok(DispatchOutcome::Success {
                            text: generation.text,
                            failures,
                        });
                    }
                    Ok(Ok(_)) => AttemptFailure::new(
                        candidate.clone(),
                        ErrorKind::MalformedResponse,
                        "empty generated text",
                    ),
                    Ok(Err(err)) => AttemptFailure::new(
                        candidate.clone(),
                        err.kind(),
                        err.to_string(),
                    ),
                    Err(_) => AttemptFailure::new(
                        candidate.clone(),
                        ErrorKind::Timeout,
                        format!(
                            "no response within {} ms",
                            attempt_timeout.as_millis()
                        ),
                    ),
                };
            warn!(
                kind = %failure.kind,
                "candidate {candidate} failed: {}", failure.detail
            );
            failures.push(failure);
        }

        error!("all {} candidate(s) failed", candidates.len());
        Ok(DispatchOutcome::AllFailed(failures))
    }
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
