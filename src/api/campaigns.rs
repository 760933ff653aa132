//! Campaign API endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::idgen;
use crate::models::{CampaignDescription, CampaignRecord};
use crate::AppState;

/// POST /api/campaigns - Generate a campaign ID and append the record.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CampaignDescription>,
) -> ApiResult<CampaignRecord> {
    // The single validated precondition: everything else defaults silently.
    if request.created_by.as_deref().unwrap_or("").trim().is_empty() {
        return error(AppError::Validation(
            "Marketing manager name is required".to_string(),
        ));
    }
    if request.platform.as_deref().unwrap_or("").trim().is_empty() {
        return error(AppError::Validation("Platform is required".to_string()));
    }

    let now = Local::now();
    let campaign_id = idgen::generate_at(&request, now);

    let record = match CampaignRecord::from_description(campaign_id, &request, now) {
        Ok(record) => record,
        Err(e) => return error(e),
    };

    match state.store.append(&record).await {
        Ok(()) => {
            tracing::info!(campaign_id = %record.campaign_id, "campaign record appended");
            success(record)
        }
        Err(e) => error(e),
    }
}

/// GET /api/campaigns - List the full campaign history.
pub async fn list_campaigns(State(state): State<AppState>) -> ApiResult<Vec<CampaignRecord>> {
    match state.store.list().await {
        Ok(records) => success(records),
        Err(e) => error(e),
    }
}

/// GET /api/campaigns/:id - Get a single campaign record.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CampaignRecord> {
    match state.store.find(&id).await {
        Ok(Some(record)) => success(record),
        Ok(None) => error(AppError::NotFound(format!("Campaign {} not found", id))),
        Err(e) => error(e),
    }
}

/// GET /api/campaigns/:id/export - Download the campaign data as JSON.
///
/// Serves the full reconstructed description, pretty-printed, under the
/// filename `<campaign_id>_data.json`.
pub async fn export_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .store
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {} not found", id)))?;

    let description = record.to_description()?;
    let body = serde_json::to_string_pretty(&description)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_data.json\"", record.campaign_id),
            ),
        ],
        body,
    )
        .into_response())
}
