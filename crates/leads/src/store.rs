use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::SupabaseConfig;
use crate::error::LeadError;
use crate::lead::{Lead, LeadId, LeadUpdate, NewLead};
use crate::stats::{LeadStats, compute_stats};

/// The table captured leads live in.
pub const LEADS_TABLE: &str = "leads";

/// Client for the `leads` table behind the database's REST interface.
///
/// Cloning is cheap, clones share the connection pool.
#[derive(Clone, Debug)]
pub struct LeadStore {
    client: Client,
    config: Arc<SupabaseConfig>,
}

impl LeadStore {
    /// Creates a store for the given project.
    #[inline]
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a store that shares an existing HTTP client.
    #[inline]
    pub fn with_client(client: Client, config: SupabaseConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Returns the project configuration.
    #[inline]
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Inserts a lead captured by the landing page.
    pub async fn save_lead(&self, lead: NewLead) -> Result<Lead, LeadError> {
        let row = lead.into_row()?;
        let resp = self
            .request(Method::POST, "select=*")
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let lead = read_rows::<Lead>(resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LeadError::Database {
                status: 200,
                message: "insert returned no row".to_owned(),
            })?;
        info!("saved lead {}", lead.id);
        Ok(lead)
    }

    /// Returns every lead, newest first.
    pub async fn get_leads(&self) -> Result<Vec<Lead>, LeadError> {
        let resp = self
            .request(Method::GET, "select=*&order=timestamp.desc")
            .send()
            .await?;
        let leads = read_rows(resp).await?;
        debug!("fetched {} lead(s)", leads.len());
        Ok(leads)
    }

    /// Applies `updates` to the lead with `id` and returns the new row.
    pub async fn update_lead(
        &self,
        id: LeadId,
        updates: &LeadUpdate,
    ) -> Result<Lead, LeadError> {
        updates.validate()?;
        let resp = self
            .request(Method::PATCH, &format!("id=eq.{id}&select=*"))
            .header("Prefer", "return=representation")
            .json(updates)
            .send()
            .await?;
        let lead = read_rows::<Lead>(resp)
            .await?
            .into_iter()
            .next()
            .ok_or(LeadError::NotFound(id))?;
        info!("updated lead {id}");
        Ok(lead)
    }

    /// Deletes the lead with `id`. Deleting a missing lead is not an error.
    pub async fn delete_lead(&self, id: LeadId) -> Result<(), LeadError> {
        let resp = self
            .request(Method::DELETE, &format!("id=eq.{id}"))
            .send()
            .await?;
        check_status(resp).await?;
        info!("deleted lead {id}");
        Ok(())
    }

    /// Computes the dashboard aggregates over every lead.
    pub async fn get_stats(
        &self,
        today: NaiveDate,
    ) -> Result<LeadStats, LeadError> {
        let leads = self.get_leads().await?;
        Ok(compute_stats(&leads, today))
    }

    fn request(&self, method: Method, query: &str) -> RequestBuilder {
        let url = format!(
            "{}/rest/v1/{LEADS_TABLE}?{query}",
            self.config.url()
        );
        self.client
            .request(method, url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(self.config.anon_key())
    }
}

/// The error body of the REST interface.
#[derive(Debug, Deserialize)]
struct RestError {
    message: Option<String>,
    details: Option<String>,
}

async fn check_status(resp: Response) -> Result<Response, LeadError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<RestError>(&body) {
        Ok(RestError {
            message: Some(message),
            details: Some(details),
        }) => format!("{message} ({details})"),
        Ok(RestError {
            message: Some(message),
            ..
        }) => message,
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned(),
        _ => body,
    };
    warn!("database request failed with {status}: {message}");
    Err(LeadError::Database {
        status: status.as_u16(),
        message,
    })
}

async fn read_rows<T: DeserializeOwned>(
    resp: Response,
) -> Result<Vec<T>, LeadError> {
    let body = check_status(resp).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}
