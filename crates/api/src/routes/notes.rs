//! Route definitions for annotation notes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Asset-scoped note routes, merged into `/assets`.
///
/// ```text
/// GET    /{id}/notes                          list_notes
/// POST   /{id}/notes                          create_note
/// POST   /{id}/notes/resolve-all              resolve_all_notes
/// PUT    /{id}/notes/{note_id}/resolve        resolve_note
/// ```
pub fn asset_notes_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/notes",
            get(notes::list_notes).post(notes::create_note),
        )
        .route("/{id}/notes/resolve-all", post(notes::resolve_all_notes))
        .route("/{id}/notes/{note_id}/resolve", put(notes::resolve_note))
}
