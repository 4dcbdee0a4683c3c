//! Recent activity feed.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: usize = 50;
const MAX_EVENT_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub limit: Option<usize>,
}

/// GET /events?limit=
///
/// Newest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    if limit == 0 || limit > MAX_EVENT_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_EVENT_LIMIT}"
        )));
    }
    let events = state.event_log.recent(limit).await;
    Ok(Json(DataResponse { data: events }))
}
