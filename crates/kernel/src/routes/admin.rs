//! Admin page routes.
//!
//! `GET /admin/{slug}` runs the page bound to `slug` through the admin shell
//! and wraps its body in the admin layout with the caller's navigation.

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Extension, Router};

use crate::error::{AppError, AppResult};
use crate::menu::TOP_LEVEL_SLUG;
use crate::middleware::CurrentUser;
use crate::shell::{ADMIN_BASE_PATH, admin_url};
use crate::state::AppState;

/// Send `/admin` to the top-level farm page.
///
/// GET /admin
async fn admin_index() -> Redirect {
    Redirect::to(&admin_url(TOP_LEVEL_SLUG))
}

/// Render one admin page.
///
/// GET /admin/{slug}
async fn admin_page(
    State(state): State<AppState>,
    current_user: Option<Extension<CurrentUser>>,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let Some(Extension(CurrentUser(user))) = current_user else {
        return Err(AppError::Unauthorized);
    };

    let page = state
        .shell()
        .dispatch(&slug, &user, state.theme(), state.base_context())?;

    let mut context = state.base_context();
    context.insert("nav", &state.shell().navigation(&user, &page.slug));
    context.insert("user", &user);

    let html = state
        .theme()
        .render_page(&page.slug, &page.title, &page.body, &mut context)?;

    tracing::debug!(slug = %page.slug, user = %user.name, "rendered admin page");
    Ok(Html(html))
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(ADMIN_BASE_PATH, get(admin_index))
        .route(&format!("{ADMIN_BASE_PATH}/{{slug}}"), get(admin_page))
}
