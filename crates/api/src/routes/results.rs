use axum::routing::post;
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Routes mounted at `/results`.
///
/// ```text
/// POST   /                                register_results
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(results::register_results))
}
