use std::env;
use std::fmt::{self, Debug, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

use lead_machine_core::FallbackPolicy;
use lead_machine_gemini_model::{GeminiConfig, GeminiConfigBuilder};
use lead_machine_leads::SupabaseConfig;
use lead_machine_model::Candidate;
use serde::Serialize;

/// Address the server listens on when none is configured.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8888";
/// Candidates tried when none are configured, most preferred first.
pub const DEFAULT_CANDIDATES: &str =
    "v1beta:gemini-1.5-flash,v1:gemini-1.5-flash,v1beta:gemini-1.5-pro";
/// Per-attempt budget when none is configured.
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 8000;

/// The error returned when an environment variable has a malformed value.
#[derive(Debug, thiserror::Error)]
#[error("invalid value `{value}` for {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            var,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// Returns the name of the offending variable.
    #[inline]
    pub fn var(&self) -> &'static str {
        self.var
    }
}

/// The database credentials handed to the browser dashboard.
///
/// Field names match what the dashboard script reads.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Project URL.
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: Option<String>,
    /// Public anonymous key.
    #[serde(rename = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: Option<String>,
}

impl SiteConfig {
    /// Returns the client configuration if both values are set.
    pub fn supabase(&self) -> Option<SupabaseConfig> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some(SupabaseConfig::new(url, key)),
            _ => None,
        }
    }
}

impl Debug for SiteConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Settings of the whole server, read once at startup.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Key for the generation API. Chat requests fail while it is unset.
    pub gemini_api_key: Option<String>,
    /// Gemini endpoint settings.
    pub gemini: GeminiConfig,
    /// Candidate order and per-attempt timeout.
    pub policy: FallbackPolicy,
    /// Database credentials.
    pub site: SiteConfig,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Values are trimmed and blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let addr_var = "LEAD_MACHINE_ADDR";
        let addr = get(addr_var).unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::new(addr_var, &addr, err))?;

        let candidates_var = "GEMINI_CANDIDATES";
        let candidates = get(candidates_var)
            .unwrap_or_else(|| DEFAULT_CANDIDATES.to_owned());
        let candidates = Candidate::parse_list(&candidates)
            .map_err(|err| {
                ConfigError::new(candidates_var, &candidates, err)
            })?;

        let timeout_var = "GEMINI_ATTEMPT_TIMEOUT_MS";
        let attempt_timeout = match get(timeout_var) {
            None => Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::new(
                        timeout_var,
                        &raw,
                        "must be greater than zero",
                    ));
                }
                Ok(ms) => Duration::from_millis(ms),
                Err(err) => {
                    return Err(ConfigError::new(timeout_var, &raw, err));
                }
            },
        };

        let mut gemini = GeminiConfigBuilder::new();
        if let Some(base_url) = get("GEMINI_BASE_URL") {
            gemini = gemini.with_base_url(base_url);
        }
        if let Some(instruction) = get("GEMINI_INSTRUCTION") {
            gemini = gemini.with_instruction(instruction);
        }

        Ok(Self {
            addr,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini: gemini.build(),
            policy: FallbackPolicy::new(candidates, attempt_timeout),
            site: SiteConfig {
                supabase_url: get("SUPABASE_URL"),
                supabase_anon_key: get("SUPABASE_ANON_KEY"),
            },
        })
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("addr", &self.addr)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini", &self.gemini)
            .field("policy", &self.policy)
            .field("site", &self.site)
            .finish()
    }
}
