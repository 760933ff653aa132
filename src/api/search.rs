//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::models::CampaignRecord;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Term matched against campaign IDs and platforms.
    pub q: String,
}

/// Search result rows and metadata.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<CampaignRecord>,
    pub total: usize,
}

/// GET /api/search - Search campaign records by ID or platform.
pub async fn search_campaigns(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    match state.store.search(&params.q).await {
        Ok(results) => {
            let total = results.len();
            success(SearchResponse { results, total })
        }
        Err(e) => error(e),
    }
}
