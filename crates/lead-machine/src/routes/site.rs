use axum::Json;
use axum::extract::State;

use crate::config::SiteConfig;
use crate::state::AppState;

/// Hands the database credentials to the dashboard.
pub(crate) async fn site_config(
    State(state): State<AppState>,
) -> Json<SiteConfig> {
    Json(SiteConfig::clone(&state.site))
}
