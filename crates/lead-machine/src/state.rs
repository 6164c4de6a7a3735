use std::sync::Arc;

use lead_machine_core::Dispatcher;
use lead_machine_leads::LeadStore;
use reqwest::Client;

use crate::config::SiteConfig;
use crate::error::ApiError;

/// Handles shared by every request.
///
/// Built once at startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) api_key: Option<Arc<str>>,
    pub(crate) leads: Option<LeadStore>,
    pub(crate) site: Arc<SiteConfig>,
}

impl AppState {
    /// Creates the state with a dispatcher and no database.
    pub fn new(dispatcher: Dispatcher, api_key: Option<String>) -> Self {
        Self {
            dispatcher,
            api_key: api_key.map(Into::into),
            leads: None,
            site: Arc::default(),
        }
    }

    /// Sets the database credentials.
    ///
    /// They are forwarded to the dashboard as is, and the leads endpoints
    /// are enabled over `client` when both are present.
    pub fn with_site(mut self, site: SiteConfig, client: &Client) -> Self {
        self.leads = site
            .supabase()
            .map(|config| LeadStore::with_client(client.clone(), config));
        self.site = Arc::new(site);
        self
    }

    pub(crate) fn leads(&self) -> Result<&LeadStore, ApiError> {
        self.leads.as_ref().ok_or(ApiError::DatabaseUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lead_machine_core::FallbackPolicy;
    use lead_machine_test_model::TestGenerationProvider;

    use super::*;

    fn state() -> AppState {
        let policy = FallbackPolicy::new(vec![], Duration::from_secs(1));
        AppState::new(
            Dispatcher::new(TestGenerationProvider::default(), policy),
            None,
        )
    }

    #[test]
    fn test_leads_need_both_credentials() {
        let client = Client::new();

        let state = state().with_site(
            SiteConfig {
                supabase_url: Some("https://demo.supabase.co/".to_owned()),
                supabase_anon_key: Some("anon-key".to_owned()),
            },
            &client,
        );
        let store = state.leads().unwrap();
        assert_eq!(store.config().url(), "https://demo.supabase.co");
        assert_eq!(store.config().anon_key(), "anon-key");

        let state = state.with_site(
            SiteConfig {
                supabase_url: None,
                supabase_anon_key: Some("anon-key".to_owned()),
            },
            &client,
        );
        assert!(matches!(state.leads(), Err(ApiError::DatabaseUnavailable)));
        assert_eq!(state.site.supabase_anon_key.as_deref(), Some("anon-key"));
    }
}
