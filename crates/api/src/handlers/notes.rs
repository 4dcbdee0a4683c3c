//! Handlers for spatial annotation notes.

use atelier_core::annotation::{Point, Region};
use atelier_core::asset::AssetId;
use atelier_core::error::CoreError;
use atelier_core::types::NoteId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /assets/{id}/notes`: the two corners of a drag gesture.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub start: Point,
    pub end: Point,
    pub text: String,
}

/// GET /assets/{id}/notes
///
/// All notes on the asset, resolved included, oldest first.
pub async fn list_notes(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let notes = state.engine.notes(&asset_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /assets/{id}/notes
pub async fn create_note(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    let region = Region::from_corners(
        input.start.x,
        input.start.y,
        input.end.x,
        input.end.y,
        state.engine.config().min_drag,
    )?;
    let note = state.engine.add_note(&asset_id, region, &input.text).await?;

    tracing::info!(asset_id = %asset_id, note_id = %note.id, "Note created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// PUT /assets/{id}/notes/{note_id}/resolve
pub async fn resolve_note(
    State(state): State<AppState>,
    Path((asset_id, note_id)): Path<(AssetId, NoteId)>,
) -> AppResult<impl IntoResponse> {
    // A note id under the wrong asset is treated as absent.
    let belongs = state
        .engine
        .notes(&asset_id)
        .await?
        .iter()
        .any(|n| n.id == note_id);
    if !belongs {
        return Err(CoreError::note_not_found(note_id).into());
    }

    let note = state.engine.resolve(&note_id).await?;
    Ok(Json(DataResponse { data: note }))
}

/// POST /assets/{id}/notes/resolve-all
///
/// Close the review cycle without an AI revision.
pub async fn resolve_all_notes(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> AppResult<impl IntoResponse> {
    let cleared = state.engine.resolve_without_promotion(&asset_id).await?;
    Ok(Json(DataResponse { data: cleared }))
}
