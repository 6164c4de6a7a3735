use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The content is moderated.
    Moderated,
    /// The model provider is rate limited or out of quota.
    RateLimitExceeded,
    /// The provider did not answer within the allotted time.
    Timeout,
    /// The provider answered, but the payload had no usable text.
    MalformedResponse,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Moderated => "moderated",
            ErrorKind::RateLimitExceeded => "rate limit exceeded",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}
