use std::fmt::{self, Display, Formatter};

use lead_machine_model::{Candidate, ErrorKind};

/// Why one candidate did not produce a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptFailure {
    /// The candidate that failed.
    pub candidate: Candidate,
    /// The classified cause.
    pub kind: ErrorKind,
    /// A human readable diagnostic, usually the provider's own message.
    pub detail: String,
}

impl AttemptFailure {
    #[inline]
    pub(crate) fn new(
        candidate: Candidate,
        kind: ErrorKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            candidate,
            kind,
            detail: detail.into(),
        }
    }
}

impl Display for AttemptFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.candidate, self.detail)
    }
}

/// The result of one dispatch.
///
/// Both variants carry the failures of every candidate that was attempted
/// and failed, in attempt order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A candidate produced a reply.
    Success {
        /// The generated text.
        text: String,
        /// Failures of the candidates tried before the successful one.
        failures: Vec<AttemptFailure>,
    },
    /// Every candidate failed.
    AllFailed(Vec<AttemptFailure>),
}

impl DispatchOutcome {
    /// Returns the generated text, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Success { text, .. } => Some(text),
            DispatchOutcome::AllFailed(_) => None,
        }
    }

    /// Returns the recorded failures in attempt order.
    #[inline]
    pub fn failures(&self) -> &[AttemptFailure] {
        match self {
            DispatchOutcome::Success { failures, .. } => failures,
            DispatchOutcome::AllFailed(failures) => failures,
        }
    }

    /// Returns `true` if any attempted candidate reported an exhausted quota
    /// or rate limit.
    ///
    /// Only the classified [`ErrorKind`] is inspected, never the message
    /// text.
    pub fn is_rate_limited(&self) -> bool {
        self.failures()
            .iter()
            .any(|failure| failure.kind == ErrorKind::RateLimitExceeded)
    }

    /// Renders the failures as one diagnostic line each.
    pub fn diagnostics(&self) -> Vec<String> {
        self.failures().iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification_ignores_message() {
        let quota_in_message = DispatchOutcome::AllFailed(vec![
            AttemptFailure::new(
                Candidate::new("v1", "a"),
                ErrorKind::Other,
                "HTTP 500: quota service unavailable",
            ),
        ]);
        assert!(!quota_in_message.is_rate_limited());

        let limited = DispatchOutcome::AllFailed(vec![
            AttemptFailure::new(
                Candidate::new("v1", "a"),
                ErrorKind::Other,
                "HTTP 500",
            ),
            AttemptFailure::new(
                Candidate::new("v1", "b"),
                ErrorKind::RateLimitExceeded,
                "HTTP 429: too many requests",
            ),
        ]);
        assert!(limited.is_rate_limited());
        assert_eq!(
            limited.diagnostics(),
            vec!["v1:a: HTTP 500", "v1:b: HTTP 429: too many requests"]
        );
    }
}
