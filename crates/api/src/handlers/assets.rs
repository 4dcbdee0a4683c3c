//! Handlers for the canonical collection, the draft stage, and version lookup.

use atelier_core::asset::{AssetId, NewAsset};
use atelier_core::types::VersionIndex;
use atelier_engine::PreviewVariant;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request / response types
   -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub variant: PreviewVariant,
}

/// Body of `DELETE /assets/{id}/draft`.
#[derive(Debug, Serialize)]
pub struct DiscardResponse {
    pub discarded: bool,
}

/* --------------------------------------------------------------------------
   Collection
   -------------------------------------------------------------------------- */

/// GET /assets
pub async fn list_assets(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assets = state.engine.list_canonical().await;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /assets
///
/// Add an asset to the canonical collection at version 0.
pub async fn ingest_asset(
    State(state): State<AppState>,
    Json(input): Json<NewAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.ingest(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /assets/pending
///
/// Assets with at least one unresolved note.
pub async fn pending_review(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assets = state.engine.pending_review().await;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.get(&asset_id).await?;
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /assets/{id}
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    state.engine.delete(&asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /assets/{id}/history
///
/// Superseded states, newest first.
pub async fn asset_history(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let history = state.engine.history(&asset_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /assets/{id}/review
pub async fn review_state(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let review = state.engine.review_state(&asset_id).await?;
    Ok(Json(DataResponse { data: review }))
}

/* --------------------------------------------------------------------------
   Draft stage
   -------------------------------------------------------------------------- */

/// GET /assets/{id}/draft
///
/// Returns `null` data when nothing is staged.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let draft = state.engine.draft(&asset_id).await?;
    Ok(Json(DataResponse { data: draft }))
}

/// DELETE /assets/{id}/draft
pub async fn discard_draft(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let discarded = state.engine.discard(&asset_id).await?;
    Ok(Json(DataResponse {
        data: DiscardResponse {
            discarded: discarded.is_some(),
        },
    }))
}

/// POST /assets/{id}/draft/promote
pub async fn promote_draft(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let promotion = state.engine.promote(&asset_id).await?;
    Ok(Json(DataResponse { data: promotion }))
}

/// GET /assets/{id}/preview?variant=original|draft
pub async fn preview(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<impl IntoResponse> {
    let asset = state.engine.preview(&asset_id, query.variant).await?;
    Ok(Json(DataResponse { data: asset }))
}

/* --------------------------------------------------------------------------
   Version chain
   -------------------------------------------------------------------------- */

/// GET /assets/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let versions = state.engine.versions_available(&asset_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /assets/{id}/versions/{version}
///
/// An unknown version is not an error; data is `null`.
pub async fn get_version(
    State(state): State<AppState>,
    Path((asset_id, version)): Path<(AssetId, VersionIndex)>,
) -> AppResult<impl IntoResponse> {
    let resolved = state.engine.resolve_version(&asset_id, version).await?;
    Ok(Json(DataResponse { data: resolved }))
}
