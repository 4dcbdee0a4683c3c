//! Handlers for revision requests.
//!
//! Submission returns as soon as the request is recorded as pending; the
//! result is staged as a draft in the background and observed through the
//! request status or the draft endpoints.

use atelier_core::asset::AssetId;
use atelier_core::error::CoreError;
use atelier_core::types::RequestId;
use atelier_engine::{RequestHandle, RevisionInput};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request / response types
   -------------------------------------------------------------------------- */

/// Body of `POST /revisions/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRevisionRequest {
    pub asset_ids: Vec<AssetId>,
    #[serde(flatten)]
    pub input: RevisionInput,
}

/// An accepted revision request.
#[derive(Debug, Serialize)]
pub struct SubmittedRevision {
    pub request_id: RequestId,
    pub asset_id: AssetId,
}

impl From<&RequestHandle> for SubmittedRevision {
    fn from(handle: &RequestHandle) -> Self {
        Self {
            request_id: handle.request_id,
            asset_id: handle.asset_id.clone(),
        }
    }
}

/// One asset's entry in a batch response.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub asset_id: AssetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

fn error_code(err: &CoreError) -> &'static str {
    match err {
        CoreError::NotFound { .. } => "NOT_FOUND",
        CoreError::Validation(_) => "VALIDATION_ERROR",
        CoreError::InvalidRegion(_) => "INVALID_REGION",
        CoreError::AssetBusy { .. } => "ASSET_BUSY",
        CoreError::NoDraftStaged { .. } => "NO_DRAFT_STAGED",
        CoreError::Conflict(_) => "CONFLICT",
        CoreError::GenerationFailed(_) => "GENERATION_FAILED",
        CoreError::Internal(_) => "INTERNAL_ERROR",
    }
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// POST /assets/{id}/revisions
///
/// Accept a revision request (202). The handle is dropped; the request
/// still completes and stages its draft.
pub async fn submit_revision(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Json(input): Json<RevisionInput>,
) -> AppResult<impl IntoResponse> {
    let strategy = input.strategy;
    let handle = state.engine.submit(&asset_id, input).await?;

    tracing::info!(
        asset_id = %asset_id,
        request_id = %handle.request_id,
        strategy = strategy.as_str(),
        "Revision accepted",
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SubmittedRevision::from(&handle),
        }),
    ))
}

/// GET /assets/{id}/revisions/current
///
/// Latest request for the asset, or `null` if none was ever made.
pub async fn current_revision(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let request = state.engine.request_status(&asset_id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /revisions/batch
///
/// One independent request per asset. A rejected entry does not affect
/// the others.
pub async fn submit_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchRevisionRequest>,
) -> AppResult<impl IntoResponse> {
    if body.asset_ids.is_empty() {
        return Err(AppError::BadRequest(
            "asset_ids must not be empty".to_string(),
        ));
    }

    let outcomes = state.engine.submit_batch(&body.asset_ids, body.input).await;
    let entries: Vec<BatchEntry> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(handle) => BatchEntry {
                asset_id: outcome.asset_id,
                request_id: Some(handle.request_id),
                error: None,
                code: None,
            },
            Err(e) => BatchEntry {
                asset_id: outcome.asset_id,
                request_id: None,
                code: Some(error_code(&e)),
                error: Some(e.to_string()),
            },
        })
        .collect();

    let accepted = entries.iter().filter(|e| e.request_id.is_some()).count();
    tracing::info!(requested = entries.len(), accepted, "Batch revision submitted");

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: entries })))
}

/// GET /revisions/{request_id}
pub async fn get_revision(
    State(state): State<AppState>,
    Path(request_id): Path<RequestId>,
) -> AppResult<impl IntoResponse> {
    let request = state.engine.request(&request_id).await?;
    Ok(Json(DataResponse { data: request }))
}
