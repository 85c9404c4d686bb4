//! Page dispatchers.
//!
//! Each admin page is bound to a [`RenderHandler`]: a closure that writes the
//! page body into a [`PageContext`]. Handlers either include a template at a
//! fixed path or forward to another subsystem's render entry point. They never
//! check capabilities; the admin shell does that before dispatch.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::AdminUser;
use crate::settings::SettingsRenderer;
use crate::theme::ThemeEngine;

/// Template paths for the template-backed pages.
pub mod templates {
    pub const DASHBOARD: &str = "admin/dashboard.html";
    pub const ANIMALS: &str = "admin/animals.html";
    pub const CROPS: &str = "admin/crops.html";
    pub const TASKS: &str = "admin/tasks.html";
    pub const INVENTORY: &str = "admin/inventory.html";
    pub const EXPENSES: &str = "admin/expenses.html";
    pub const VACCINATIONS: &str = "admin/vaccinations.html";
    pub const REPORTS: &str = "admin/reports.html";
    pub const FRONTEND_PAGES: &str = "admin/frontend-pages.html";
    pub const SMTP: &str = "admin/smtp.html";
    pub const SETTINGS: &str = "admin/settings.html";
}

/// Page rendering failures. All of them are fatal for the request.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {template}")]
    TemplateMissing { template: String },

    #[error("template error")]
    Template(#[from] tera::Error),
}

/// Render operation bound to a page slug.
///
/// Shared by reference count so that two menu entries can point at the very
/// same handler.
pub type RenderHandler = Arc<dyn Fn(&mut PageContext<'_>) -> Result<(), RenderError> + Send + Sync>;

/// Ambient request context handed to a render handler.
pub struct PageContext<'a> {
    theme: &'a ThemeEngine,
    slug: &'a str,
    user: &'a AdminUser,
    vars: tera::Context,
    output: String,
}

impl<'a> PageContext<'a> {
    /// Create a context for rendering `slug` on behalf of `user`.
    ///
    /// `vars` are the base template variables (site name and such).
    pub fn new(
        theme: &'a ThemeEngine,
        slug: &'a str,
        user: &'a AdminUser,
        mut vars: tera::Context,
    ) -> Self {
        vars.insert("slug", slug);
        vars.insert("user", user);
        Self {
            theme,
            slug,
            user,
            vars,
            output: String::new(),
        }
    }

    pub fn slug(&self) -> &str {
        self.slug
    }

    pub fn user(&self) -> &AdminUser {
        self.user
    }

    /// Template variables, for handlers that add their own.
    pub fn vars_mut(&mut self) -> &mut tera::Context {
        &mut self.vars
    }

    /// Append raw markup to the page body.
    pub fn write_str(&mut self, markup: &str) {
        self.output.push_str(markup);
    }

    /// Render a template with the current variables and append it to the body.
    pub fn include_template(&mut self, template: &str) -> Result<(), RenderError> {
        let html = self.theme.render(template, &self.vars)?;
        self.output.push_str(&html);
        Ok(())
    }

    /// The rendered body so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

/// A handler that includes the template at `template`.
pub fn template_page(template: &'static str) -> RenderHandler {
    Arc::new(move |ctx: &mut PageContext<'_>| ctx.include_template(template))
}

/// A handler that forwards to the settings renderer.
pub fn settings_page(renderer: Arc<dyn SettingsRenderer>) -> RenderHandler {
    Arc::new(move |ctx: &mut PageContext<'_>| renderer.render_settings_page(ctx))
}

/// The render handlers for every farm admin page.
#[derive(Clone)]
pub struct PageDispatchers {
    /// Bound to both the top-level entry and the Dashboard entry.
    pub dashboard: RenderHandler,
    pub animals: RenderHandler,
    pub crops: RenderHandler,
    pub tasks: RenderHandler,
    pub inventory: RenderHandler,
    pub expenses: RenderHandler,
    pub vaccinations: RenderHandler,
    pub reports: RenderHandler,
    pub frontend_pages: RenderHandler,
    pub smtp: RenderHandler,
    pub settings: RenderHandler,
}

impl PageDispatchers {
    /// Build the standard handlers; Settings forwards to `settings`.
    pub fn new(settings: Arc<dyn SettingsRenderer>) -> Self {
        Self {
            dashboard: template_page(templates::DASHBOARD),
            animals: template_page(templates::ANIMALS),
            crops: template_page(templates::CROPS),
            tasks: template_page(templates::TASKS),
            inventory: template_page(templates::INVENTORY),
            expenses: template_page(templates::EXPENSES),
            vaccinations: template_page(templates::VACCINATIONS),
            reports: template_page(templates::REPORTS),
            frontend_pages: template_page(templates::FRONTEND_PAGES),
            smtp: template_page(templates::SMTP),
            settings: settings_page(settings),
        }
    }
}

impl std::fmt::Debug for PageDispatchers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDispatchers").finish_non_exhaustive()
    }
}
