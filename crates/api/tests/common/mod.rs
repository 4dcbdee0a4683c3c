#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_engine::config::EngineConfig;
use atelier_engine::RevisionEngine;
use atelier_events::{EventBus, EventLog};

/// Simulated delay used by most tests: long enough to observe `pending`,
/// short enough to keep the suite fast.
pub const TEST_DELAY: Duration = Duration::from_millis(20);

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        event_log_capacity: 100,
    }
}

pub fn engine_config(simulated_delay: Duration) -> EngineConfig {
    EngineConfig {
        simulated_delay,
        ..EngineConfig::default()
    }
}

/// Build the full application router with the production middleware stack.
///
/// Must be called inside a Tokio runtime: the event log task is spawned here.
pub fn build_test_app_with(engine_config: EngineConfig) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let event_log = EventLog::new(config.event_log_capacity);
    tokio::spawn(
        event_log
            .clone()
            .run(event_bus.subscribe(), CancellationToken::new()),
    );

    let state = AppState {
        engine: RevisionEngine::new(engine_config, Arc::clone(&event_bus)),
        config: Arc::new(config.clone()),
        event_bus,
        event_log,
    };
    build_app_router(state, &config)
}

pub fn build_test_app() -> Router {
    build_test_app_with(engine_config(TEST_DELAY))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn put(app: Router, uri: &str) -> Response {
    send(app, Method::PUT, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn image_asset(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "locator": format!("/assets/{name}"),
        "kind": "image",
    })
}

/// Ingest an image asset and return its JSON representation.
pub async fn ingest(app: &Router, id: &str, name: &str) -> serde_json::Value {
    let response = post_json(app.clone(), "/api/v1/assets", image_asset(id, name)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Add a note with a comfortably large region and return its id.
pub async fn add_note(app: &Router, asset_id: &str, text: &str) -> String {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/assets/{asset_id}/notes"),
        serde_json::json!({
            "start": { "x": 0.1, "y": 0.1 },
            "end": { "x": 0.4, "y": 0.3 },
            "text": text,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Poll the asset's current request until it leaves `pending`.
pub async fn wait_for_revision(app: &Router, asset_id: &str) -> serde_json::Value {
    let uri = format!("/api/v1/assets/{asset_id}/revisions/current");
    for _ in 0..200 {
        let json = body_json(get(app.clone(), &uri).await).await;
        if json["data"]["status"] != "pending" {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("revision for {asset_id} did not finish in time");
}
