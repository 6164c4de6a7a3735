use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use lead_machine_leads::{
    Lead, LeadFilter, LeadId, LeadStats, LeadUpdate, NewLead, to_csv,
};

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) async fn create_lead(
    State(state): State<AppState>,
    Json(lead): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let lead = state.leads()?.save_lead(lead).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub(crate) async fn list_leads(
    State(state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = state.leads()?.get_leads().await?;
    Ok(Json(filter.apply(leads)))
}

pub(crate) async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<LeadId>,
    Json(updates): Json<LeadUpdate>,
) -> Result<Json<Lead>, ApiError> {
    let lead = state.leads()?.update_lead(id, &updates).await?;
    Ok(Json(lead))
}

pub(crate) async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<LeadId>,
) -> Result<StatusCode, ApiError> {
    state.leads()?.delete_lead(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn lead_stats(
    State(state): State<AppState>,
) -> Result<Json<LeadStats>, ApiError> {
    let today = Utc::now().date_naive();
    let stats = state.leads()?.get_stats(today).await?;
    Ok(Json(stats))
}

/// Downloads the filtered leads as a spreadsheet.
pub(crate) async fn export_leads(
    State(state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = filter.apply(state.leads()?.get_leads().await?);
    let disposition = format!(
        "attachment; filename=\"export_leads_{}.csv\"",
        Utc::now().date_naive()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        to_csv(&leads),
    ))
}
