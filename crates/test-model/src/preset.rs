use lead_machine_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// What a scripted candidate answers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// A successful generation with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// A provider error.
    #[serde(rename = "failure")]
    Failure {
        /// Kind reported by the error.
        kind: ErrorKind,
        /// Message carried by the error.
        message: String,
    },
    /// The provider never answers.
    #[serde(rename = "hang")]
    Hang,
}

/// The preset response for one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// The outcome of the call.
    pub outcome: PresetOutcome,
    /// Simulated latency in milliseconds before the outcome is delivered.
    pub delay_ms: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` that succeeds with `text`.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            outcome: PresetOutcome::Text(text.into()),
            delay_ms: None,
        }
    }

    /// Creates a `PresetResponse` that fails.
    #[inline]
    pub fn with_failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            outcome: PresetOutcome::Failure {
                kind,
                message: message.into(),
            },
            delay_ms: None,
        }
    }

    /// Creates a `PresetResponse` that never completes.
    #[inline]
    pub fn hanging() -> Self {
        Self {
            outcome: PresetOutcome::Hang,
            delay_ms: None,
        }
    }

    /// Sets the simulated latency.
    #[inline]
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}
