//! Route definitions for revision requests.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::revisions;
use crate::state::AppState;

/// Asset-scoped revision routes, merged into `/assets`.
///
/// ```text
/// POST   /{id}/revisions                  submit_revision
/// GET    /{id}/revisions/current          current_revision
/// ```
pub fn asset_revisions_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/revisions", post(revisions::submit_revision))
        .route("/{id}/revisions/current", get(revisions::current_revision))
}

/// Routes mounted at `/revisions`.
///
/// ```text
/// POST   /batch                           submit_batch
/// GET    /{request_id}                    get_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/batch", post(revisions::submit_batch))
        .route("/{request_id}", get(revisions::get_revision))
}
