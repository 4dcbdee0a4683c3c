//! Route definitions for the canonical collection, drafts, and versions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                                list_assets
/// POST   /                                ingest_asset
/// GET    /pending                         pending_review
/// GET    /{id}                            get_asset
/// DELETE /{id}                            delete_asset
/// GET    /{id}/history                    asset_history
/// GET    /{id}/review                     review_state
/// GET    /{id}/draft                      get_draft
/// DELETE /{id}/draft                      discard_draft
/// POST   /{id}/draft/promote              promote_draft
/// GET    /{id}/preview                    preview (?variant=original|draft)
/// GET    /{id}/versions                   list_versions
/// GET    /{id}/versions/{version}         get_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::ingest_asset))
        .route("/pending", get(assets::pending_review))
        .route(
            "/{id}",
            get(assets::get_asset).delete(assets::delete_asset),
        )
        .route("/{id}/history", get(assets::asset_history))
        .route("/{id}/review", get(assets::review_state))
        .route(
            "/{id}/draft",
            get(assets::get_draft).delete(assets::discard_draft),
        )
        .route("/{id}/draft/promote", post(assets::promote_draft))
        .route("/{id}/preview", get(assets::preview))
        .route("/{id}/versions", get(assets::list_versions))
        .route("/{id}/versions/{version}", get(assets::get_version))
}
