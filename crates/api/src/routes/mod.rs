pub mod assets;
pub mod events;
pub mod health;
pub mod notes;
pub mod results;
pub mod revisions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                                          list, ingest
/// /assets/pending                                  assets with open notes
/// /assets/{id}                                     get, delete
/// /assets/{id}/history                             superseded states
/// /assets/{id}/review                              review cycle state
/// /assets/{id}/draft                               get, discard
/// /assets/{id}/draft/promote                       promote (POST)
/// /assets/{id}/preview?variant=                    original/draft toggle
/// /assets/{id}/versions                            resolvable versions
/// /assets/{id}/versions/{version}                  one version
///
/// /assets/{id}/notes                               list, add
/// /assets/{id}/notes/resolve-all                   resolve without promotion
/// /assets/{id}/notes/{note_id}/resolve             resolve one (PUT)
///
/// /assets/{id}/revisions                           submit (POST, 202)
/// /assets/{id}/revisions/current                   latest request status
/// /revisions/batch                                 refine several assets
/// /revisions/{request_id}                          one request
///
/// /results                                         register result locators
/// /events                                          recent activity feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/assets",
            assets::router()
                .merge(notes::asset_notes_router())
                .merge(revisions::asset_revisions_router()),
        )
        .nest("/revisions", revisions::router())
        .nest("/results", results::router())
        .nest("/events", events::router())
}
