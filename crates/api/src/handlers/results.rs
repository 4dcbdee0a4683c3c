//! Registration of externally produced result files for version lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterResults {
    pub locators: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResults {
    pub submitted: usize,
    /// Locators whose file name was not already taken.
    pub registered: usize,
}

/// POST /results
///
/// Add locators to the naming-convention pool consulted by version lookup.
pub async fn register_results(
    State(state): State<AppState>,
    Json(body): Json<RegisterResults>,
) -> AppResult<impl IntoResponse> {
    if body.locators.iter().any(|l| l.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "locators must not be empty".to_string(),
        ));
    }
    let submitted = body.locators.len();
    let registered = state.engine.register_results(body.locators).await;

    tracing::info!(submitted, registered, "Result locators registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisteredResults {
                submitted,
                registered,
            },
        }),
    ))
}
