//! REST endpoints for screening sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use super::countries::COUNTRIES;
use super::registry::SessionRegistry;
use crate::error::Result;

/// Shared state for screening routes.
#[derive(Clone)]
pub struct ScreeningRouteState {
    pub registry: Arc<SessionRegistry>,
}

/// Body of `POST /api/sessions/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub content: String,
    #[serde(default)]
    pub country_code: Option<String>,
}

fn not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("No session {id}")})),
    )
        .into_response()
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "talent-scout"
    }))
}

/// GET /api/countries
async fn list_countries() -> impl IntoResponse {
    Json(COUNTRIES)
}

/// POST /api/sessions
///
/// Creates a session and returns its first view, greeting included.
async fn create_session(State(state): State<ScreeningRouteState>) -> impl IntoResponse {
    let handle = state.registry.create().await;
    let view = handle.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// GET /api/sessions/{id}
async fn get_session(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.registry.get(id).await {
        Some(handle) => Json(handle.lock().await.view()).into_response(),
        None => not_found(id),
    }
}

/// POST /api/sessions/{id}/messages
///
/// Submits one answer. Rejected answers still return 200: the view carries
/// the re-prompt.
async fn submit_message(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitRequest>,
) -> impl IntoResponse {
    let Some(handle) = state.registry.get(id).await else {
        return not_found(id);
    };
    let mut session = handle.lock().await;
    session
        .submit(&body.content, body.country_code.as_deref())
        .await;
    Json(session.view()).into_response()
}

/// DELETE /api/sessions/{id}
async fn delete_session(
    State(state): State<ScreeningRouteState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if state.registry.remove(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(id)
    }
}

/// Build the screening REST routes.
pub fn screening_routes(state: ScreeningRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(list_countries))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/messages", post(submit_message))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `0.0.0.0:{port}` and serve the screening routes until shutdown.
pub async fn serve(port: u16, registry: Arc<SessionRegistry>) -> Result<()> {
    let app = screening_routes(ScreeningRouteState { registry });
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Screening server started");
    axum::serve(listener, app).await?;
    Ok(())
}
