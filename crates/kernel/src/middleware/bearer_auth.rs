//! Bearer token authentication middleware.
//!
//! Checks `Authorization: Bearer <token>` headers against the user directory
//! and stores the matching [`AdminUser`] in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AdminUser);

/// Middleware to authenticate bearer tokens.
///
/// If a valid token is present, sets [`CurrentUser`] in request extensions.
/// If no token is present, passes through without modification.
/// If an unknown token is present, returns 401.
pub async fn authenticate_bearer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let Some(auth_header) = auth_header else {
        return next.run(request).await;
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return next.run(request).await;
    };

    let Some(user) = state.users().authenticate(token.trim()).cloned() else {
        return AppError::Unauthorized.into_response();
    };

    debug!(user = %user.name, "bearer token accepted");
    request.extensions_mut().insert(CurrentUser(user));

    next.run(request).await
}
