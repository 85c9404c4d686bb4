//! Farmdesk Kernel Library
//!
//! Farm admin menu registry, page dispatchers and the HTTP admin shell.
//! The main entry point for running the server is the `farmdesk` binary.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod menu;
pub mod middleware;
pub mod pages;
pub mod permissions;
pub mod routes;
pub mod settings;
pub mod shell;
pub mod state;
pub mod theme;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::admin::router())
        .merge(routes::health::router())
        // TraceLayer → bearer auth → routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate_bearer,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
