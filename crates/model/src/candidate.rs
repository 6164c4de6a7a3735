use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One `(api_version, model_id)` pair to try against a provider.
///
/// The textual form is `version:model`, e.g. `v1beta:gemini-1.5-flash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// The API version tag the endpoint is addressed by.
    pub api_version: String,
    /// The model identifier.
    pub model_id: String,
}

impl Candidate {
    /// Creates a new candidate.
    #[inline]
    pub fn new<V: Into<String>, M: Into<String>>(
        api_version: V,
        model_id: M,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            model_id: model_id.into(),
        }
    }

    /// Parses a comma separated list of candidates, keeping their order.
    ///
    /// Blank entries are skipped, so a trailing comma is accepted.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, ParseCandidateError> {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.api_version, self.model_id)
    }
}

impl FromStr for Candidate {
    type Err = ParseCandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((version, model)) = s.trim().split_once(':') else {
            return Err(ParseCandidateError(s.to_owned()));
        };
        let (version, model) = (version.trim(), model.trim());
        if version.is_empty() || model.is_empty() {
            return Err(ParseCandidateError(s.to_owned()));
        }
        Ok(Self::new(version, model))
    }
}

/// The error returned when a candidate string is not `version:model`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCandidateError(String);

impl Display for ParseCandidateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid candidate `{}`, expected `version:model`", self.0)
    }
}

impl Error for ParseCandidateError {}
