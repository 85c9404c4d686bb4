//! Health check endpoint.
//!
//! Returns 200 OK once the admin shell has pages registered,
//! 503 Service Unavailable otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    pages: usize,
}

/// Status for a shell with `pages` pages whose menu may not be registered yet.
fn health_status(registered: bool, pages: usize) -> (StatusCode, &'static str) {
    if registered && pages > 0 {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    }
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let pages = state.shell().len();
    let (status_code, status) = health_status(state.menu().is_registered(), pages);

    (status_code, Json(HealthResponse { status, pages }))
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
