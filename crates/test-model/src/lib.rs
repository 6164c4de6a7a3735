//! A local fake generation provider for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lead_machine_model::{
    Candidate, ErrorKind, Generation, GenerationProvider,
    GenerationProviderError, GenerationRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl GenerationProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake provider for testing purpose.
///
/// Before sending requests, you need to script how each candidate should
/// respond. Candidates without a script fail with [`ErrorKind::Other`].
/// Every call is recorded, in order, so tests can check which candidates
/// were actually attempted. Clones share the same attempt log.
///
/// # Note
///
/// This type is not optimized for production use, the script is copied
/// into every call. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestGenerationProvider {
    script: HashMap<Candidate, PresetResponse>,
    attempts: Arc<Mutex<Vec<(Candidate, GenerationRequest)>>>,
}

impl TestGenerationProvider {
    #[inline]
    pub fn add_response(
        &mut self,
        candidate: Candidate,
        preset: PresetResponse,
    ) {
        self.script.insert(candidate, preset);
    }

    /// Returns the candidates attempted so far, in call order.
    pub fn attempted(&self) -> Vec<Candidate> {
        self.attempts()
            .into_iter()
            .map(|(candidate, _)| candidate)
            .collect()
    }

    /// Returns every call made so far, in call order.
    pub fn attempts(&self) -> Vec<(Candidate, GenerationRequest)> {
        match self.attempts.lock() {
            Ok(attempts) => attempts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Debug for TestGenerationProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestGenerationProvider")
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}

impl GenerationProvider for TestGenerationProvider {
    type Error = crate::Error;

    fn generate(
        &self,
        candidate: &Candidate,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<Generation, Self::Error>> + Send + 'static
    {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push((candidate.clone(), req.clone()));
        }

        let preset = self.script.get(candidate).cloned();
        let delay = preset
            .as_ref()
            .and_then(|p| p.delay_ms.map(Duration::from_millis))
            .unwrap_or(Duration::from_millis(1));
        let candidate = candidate.clone();

        async move {
            sleep(delay).await;
            let Some(preset) = preset else {
                return Err(Error {
                    message: format!("no preset for candidate {candidate}"),
                    kind: ErrorKind::Other,
                });
            };
            match preset.outcome {
                PresetOutcome::Text(text) => Ok(Generation { text }),
                PresetOutcome::Failure { kind, message } => {
                    Err(Error { message, kind })
                }
                PresetOutcome::Hang => pending().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_scripted_responses() {
        let mut provider = TestGenerationProvider::default();
        provider.add_response(
            Candidate::new("v1", "ok"),
            PresetResponse::with_text("Hello, world!"),
        );
        provider.add_response(
            Candidate::new("v1", "busy"),
            PresetResponse::with_failure(ErrorKind::RateLimitExceeded, "quota"),
        );

        let req = GenerationRequest::new("key", "Hi");
        let generation = provider
            .generate(&Candidate::new("v1", "ok"), &req)
            .await
            .unwrap();
        assert_eq!(generation.text, "Hello, world!");

        let err = provider
            .generate(&Candidate::new("v1", "busy"), &req)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);

        let err = provider
            .generate(&Candidate::new("v1", "unknown"), &req)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        assert_eq!(
            provider.attempted(),
            vec![
                Candidate::new("v1", "ok"),
                Candidate::new("v1", "busy"),
                Candidate::new("v1", "unknown"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_response() {
        let mut provider = TestGenerationProvider::default();
        provider
            .add_response(Candidate::new("v1", "slow"), PresetResponse::hanging());

        let req = GenerationRequest::new("key", "Hi");
        let fut = provider.generate(&Candidate::new("v1", "slow"), &req);
        assert!(timeout(Duration::from_secs(30), fut).await.is_err());
    }
}
