//! HTTP routes.

mod chat;
mod leads;
mod site;

use axum::Router;
use axum::routing::{any, get, patch};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
///
/// Both the `/api` paths and the legacy serverless function paths are
/// served, so the static site works unchanged behind either.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", any(chat::chat))
        .route("/.netlify/functions/chat", any(chat::chat))
        .route("/api/config", get(site::site_config))
        .route("/.netlify/functions/get-config", get(site::site_config))
        .route(
            "/api/leads",
            get(leads::list_leads).post(leads::create_lead),
        )
        .route("/api/leads/stats", get(leads::lead_stats))
        .route("/api/leads/export.csv", get(leads::export_leads))
        .route(
            "/api/leads/:id",
            patch(leads::update_lead).delete(leads::delete_lead),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
