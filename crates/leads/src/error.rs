use crate::lead::LeadId;

/// Errors returned by [`LeadStore`](crate::LeadStore).
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    /// The lead data was rejected before reaching the database.
    #[error("invalid lead: {0}")]
    Invalid(String),
    /// No lead has the given id.
    #[error("lead {0} not found")]
    NotFound(LeadId),
    /// The database answered with an error status.
    #[error("database returned HTTP {status}: {message}")]
    Database {
        /// HTTP status code.
        status: u16,
        /// The database's error message.
        message: String,
    },
    /// The database answered with a body that is not the expected rows.
    #[error("unexpected database response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The database could not be reached.
    #[error("database request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
