//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::auth::UserDirectory;
use crate::config::Config;
use crate::i18n::{Catalog, Translator};
use crate::menu::MenuRegistry;
use crate::pages::PageDispatchers;
use crate::settings::{SiteSettings, SiteSettingsPage};
use crate::shell::AdminShell;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything inside is built
/// during start-up and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Theme engine for template rendering.
    theme: ThemeEngine,

    /// Declared admin menu.
    menu: MenuRegistry,

    /// Registered admin pages.
    shell: AdminShell,

    /// Bearer token → admin user.
    users: UserDirectory,

    /// Site settings exposed to every template.
    site: SiteSettings,
}

impl AppState {
    /// Load templates, users and translations from the configured paths and
    /// register the admin menu.
    pub fn new(config: &Config) -> Result<Self> {
        let theme = ThemeEngine::new(&config.templates_dir).context("failed to load templates")?;
        let users = UserDirectory::load(&config.users_file)?;
        let catalog = match &config.translations_file {
            Some(path) => Catalog::load(path)?,
            None => Catalog::empty(),
        };

        Self::build(theme, users, &catalog, SiteSettings::from_config(config))
    }

    /// Assemble state from already-loaded parts.
    pub fn build(
        theme: ThemeEngine,
        users: UserDirectory,
        translator: &dyn Translator,
        site: SiteSettings,
    ) -> Result<Self> {
        let (menu, shell) = register_admin_menu(translator, &site)?;

        info!(
            pages = shell.len(),
            users = users.len(),
            "admin shell ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                theme,
                menu,
                shell,
                users,
                site,
            }),
        })
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }

    /// Get the menu registry.
    pub fn menu(&self) -> &MenuRegistry {
        &self.inner.menu
    }

    /// Get the admin shell.
    pub fn shell(&self) -> &AdminShell {
        &self.inner.shell
    }

    /// Get the user directory.
    pub fn users(&self) -> &UserDirectory {
        &self.inner.users
    }

    pub fn site(&self) -> &SiteSettings {
        &self.inner.site
    }

    /// Template variables common to every admin page.
    pub fn base_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("site_name", &self.inner.site.site_name);
        context.insert("site", &self.inner.site);
        context
    }
}

/// Build the farm admin menu and register it with a fresh shell.
pub fn register_admin_menu(
    translator: &dyn Translator,
    site: &SiteSettings,
) -> Result<(MenuRegistry, AdminShell)> {
    let pages = PageDispatchers::new(Arc::new(SiteSettingsPage::new(site.clone())));
    let menu = MenuRegistry::farm_admin(&pages);
    let mut shell = AdminShell::new();
    menu.register(&mut shell, translator)
        .context("failed to register admin menu")?;
    Ok((menu, shell))
}
