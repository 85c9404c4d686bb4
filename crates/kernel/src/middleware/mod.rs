//! HTTP middleware.

mod bearer_auth;

pub use bearer_auth::{CurrentUser, authenticate_bearer};
