//! The lead machine server.
//!
//! Serves the landing page's chat assistant, which answers through a
//! fallback list of Gemini models, and the dashboard's leads API. Use
//! [`router`] to mount it in your own host, or run the bundled binary.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod error;
mod routes;
mod state;

pub use config::{
    AppConfig, ConfigError, DEFAULT_ADDR, DEFAULT_ATTEMPT_TIMEOUT_MS,
    DEFAULT_CANDIDATES, SiteConfig,
};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

/// Re-exports of [`lead_machine_core`] crate.
pub mod core {
    pub use lead_machine_core::*;
}
