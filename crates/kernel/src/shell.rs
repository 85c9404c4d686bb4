//! Admin shell: the host side of menu registration.
//!
//! Pages are registered once during start-up through [`MenuHost`] and are
//! read-only afterwards. Every request resolves a slug, checks the caller's
//! capability, and only then runs the bound render handler.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::AdminUser;
use crate::error::{AppError, AppResult};
use crate::menu::{MenuError, MenuHost, PageRegistration};
use crate::pages::{PageContext, RenderHandler};
use crate::permissions::Capability;
use crate::theme::ThemeEngine;

/// URL prefix for admin pages.
pub const ADMIN_BASE_PATH: &str = "/admin";

/// A page known to the shell.
#[derive(Clone)]
pub struct RegisteredPage {
    pub slug: String,
    pub title: String,
    pub label: String,
    pub capability: Capability,
    pub parent: Option<String>,
    /// Sidebar icon and position; top-level pages only.
    pub icon: Option<String>,
    pub position: Option<u32>,
    handler: RenderHandler,
}

impl RegisteredPage {
    fn new(page: PageRegistration, parent: Option<String>) -> Self {
        Self {
            slug: page.slug,
            title: page.title,
            label: page.label,
            capability: page.capability,
            parent,
            icon: None,
            position: None,
            handler: page.handler,
        }
    }

    pub fn handler(&self) -> &RenderHandler {
        &self.handler
    }
}

impl std::fmt::Debug for RegisteredPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPage")
            .field("slug", &self.slug)
            .field("label", &self.label)
            .field("capability", &self.capability)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Navigation link shown in the admin sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub slug: String,
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    pub active: bool,
    pub children: Vec<NavItem>,
}

/// Output of a successful dispatch.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub body: String,
}

/// Page table of the admin UI.
#[derive(Debug, Default)]
pub struct AdminShell {
    /// Registration order.
    pages: Vec<RegisteredPage>,
    /// slug -> index into `pages`
    index: HashMap<String, usize>,
}

impl AdminShell {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, page: RegisteredPage) -> Result<(), MenuError> {
        if self.index.contains_key(&page.slug) {
            warn!(slug = %page.slug, "rejected duplicate admin page");
            return Err(MenuError::DuplicateSlug(page.slug));
        }
        debug!(
            slug = %page.slug,
            parent = ?page.parent,
            capability = %page.capability,
            "registered admin page"
        );
        self.index.insert(page.slug.clone(), self.pages.len());
        self.pages.push(page);
        Ok(())
    }

    /// Look up a page by slug.
    pub fn resolve(&self, slug: &str) -> Option<&RegisteredPage> {
        self.index.get(slug).and_then(|&i| self.pages.get(i))
    }

    /// All pages in registration order.
    pub fn pages(&self) -> &[RegisteredPage] {
        &self.pages
    }

    /// Top-level pages ordered by menu position, then registration order.
    pub fn top_level_pages(&self) -> Vec<&RegisteredPage> {
        let mut top: Vec<_> = self.pages.iter().filter(|p| p.parent.is_none()).collect();
        top.sort_by_key(|p| p.position.unwrap_or(u32::MAX));
        top
    }

    /// Children of `parent` in registration order.
    pub fn children_of(&self, parent: &str) -> Vec<&RegisteredPage> {
        self.pages
            .iter()
            .filter(|p| p.parent.as_deref() == Some(parent))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Render the page at `slug` for `user`.
    ///
    /// Fails with [`AppError::NotFound`] for unknown slugs and
    /// [`AppError::Forbidden`] when the user lacks the page's capability; in
    /// both cases the handler is not run.
    pub fn dispatch(
        &self,
        slug: &str,
        user: &AdminUser,
        theme: &ThemeEngine,
        vars: tera::Context,
    ) -> AppResult<RenderedPage> {
        let page = self.resolve(slug).ok_or(AppError::NotFound)?;

        if !user.has_capability(page.capability) {
            warn!(
                user = %user.name,
                slug = %page.slug,
                capability = %page.capability,
                "admin page access denied"
            );
            return Err(AppError::Forbidden(page.capability));
        }

        let mut ctx = PageContext::new(theme, &page.slug, user, vars);
        (page.handler)(&mut ctx)?;

        Ok(RenderedPage {
            slug: page.slug.clone(),
            title: page.title.clone(),
            body: ctx.into_output(),
        })
    }

    /// Sidebar navigation visible to `user`, with `active_slug` highlighted.
    ///
    /// Top-level pages the user cannot open are left out along with all of
    /// their children.
    pub fn navigation(&self, user: &AdminUser, active_slug: &str) -> Vec<NavItem> {
        self.top_level_pages()
            .into_iter()
            .filter(|top| user.has_capability(top.capability))
            .map(|top| {
                let children: Vec<NavItem> = self
                    .children_of(&top.slug)
                    .into_iter()
                    .filter(|child| user.has_capability(child.capability))
                    .map(|child| nav_item(child, active_slug, Vec::new()))
                    .collect();
                nav_item(top, active_slug, children)
            })
            .collect()
    }
}

fn nav_item(page: &RegisteredPage, active_slug: &str, children: Vec<NavItem>) -> NavItem {
    NavItem {
        slug: page.slug.clone(),
        label: page.label.clone(),
        url: admin_url(&page.slug),
        icon: page.icon.clone(),
        active: page.slug == active_slug,
        children,
    }
}

/// URL of the admin page with `slug`.
pub fn admin_url(slug: &str) -> String {
    format!("{ADMIN_BASE_PATH}/{slug}")
}

impl MenuHost for AdminShell {
    fn register_top_level_page(
        &mut self,
        page: PageRegistration,
        icon: &str,
        position: u32,
    ) -> Result<(), MenuError> {
        let mut page = RegisteredPage::new(page, None);
        page.icon = Some(icon.to_string());
        page.position = Some(position);
        self.insert(page)
    }

    fn register_sub_page(
        &mut self,
        parent_slug: &str,
        page: PageRegistration,
    ) -> Result<(), MenuError> {
        let parent_is_top_level = self
            .resolve(parent_slug)
            .is_some_and(|p| p.parent.is_none());
        if !parent_is_top_level {
            warn!(parent = %parent_slug, slug = %page.slug, "sub page has no top-level parent");
            return Err(MenuError::UnknownParent(parent_slug.to_string()));
        }
        self.insert(RegisteredPage::new(page, Some(parent_slug.to_string())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::i18n::Catalog;
    use crate::menu::{MenuRegistry, TOP_LEVEL_ICON, TOP_LEVEL_SLUG, slugs};
    use crate::pages::{PageDispatchers, RenderError, templates};
    use crate::settings::SettingsRenderer;

    struct StaticSettings;

    impl SettingsRenderer for StaticSettings {
        fn render_settings_page(&self, ctx: &mut PageContext<'_>) -> Result<(), RenderError> {
            ctx.write_str("settings");
            Ok(())
        }
    }

    fn registration(
        slug: &str,
        capability: Capability,
        handler: RenderHandler,
    ) -> PageRegistration {
        PageRegistration {
            slug: slug.to_string(),
            title: slug.to_string(),
            label: slug.to_string(),
            capability,
            handler,
        }
    }

    fn text(body: &'static str) -> RenderHandler {
        Arc::new(move |ctx: &mut PageContext<'_>| -> Result<(), RenderError> {
            ctx.write_str(body);
            Ok(())
        })
    }

    fn farm_shell() -> AdminShell {
        let registry = MenuRegistry::farm_admin(&PageDispatchers::new(Arc::new(StaticSettings)));
        let mut shell = AdminShell::new();
        registry.register(&mut shell, &Catalog::empty()).unwrap();
        shell
    }

    fn theme() -> ThemeEngine {
        ThemeEngine::from_raw_templates(&[
            (templates::DASHBOARD, "dashboard for {{ user.name }}"),
            (templates::CROPS, "crops"),
        ])
        .unwrap()
    }

    #[test]
    fn farm_menu_registers_every_page() {
        let shell = farm_shell();
        assert_eq!(shell.len(), 12);
        let top = shell.resolve(TOP_LEVEL_SLUG).unwrap();
        assert_eq!(top.icon.as_deref(), Some(TOP_LEVEL_ICON));
        assert_eq!(shell.children_of(TOP_LEVEL_SLUG).len(), 11);
    }

    #[test]
    fn top_level_and_dashboard_share_one_handler() {
        let shell = farm_shell();
        let top = shell.resolve(TOP_LEVEL_SLUG).unwrap();
        let dashboard = shell.resolve(slugs::DASHBOARD).unwrap();
        assert!(Arc::ptr_eq(top.handler(), dashboard.handler()));
        assert_eq!(top.capability, dashboard.capability);
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let mut shell = AdminShell::new();
        shell
            .register_top_level_page(
                registration("root", Capability::ManageFarm, text("a")),
                "icon",
                1,
            )
            .unwrap();
        let err = shell
            .register_sub_page("root", registration("root", Capability::ManageFarm, text("b")))
            .unwrap_err();
        assert_eq!(err, MenuError::DuplicateSlug("root".to_string()));
        assert_eq!(shell.len(), 1);
    }

    #[test]
    fn sub_page_needs_registered_top_level_parent() {
        let mut shell = AdminShell::new();
        let err = shell
            .register_sub_page("missing", registration("a", Capability::ManageFarm, text("a")))
            .unwrap_err();
        assert_eq!(err, MenuError::UnknownParent("missing".to_string()));

        shell
            .register_top_level_page(
                registration("root", Capability::ManageFarm, text("r")),
                "icon",
                1,
            )
            .unwrap();
        shell
            .register_sub_page("root", registration("child", Capability::ManageFarm, text("c")))
            .unwrap();
        let err = shell
            .register_sub_page(
                "child",
                registration("grandchild", Capability::ManageFarm, text("g")),
            )
            .unwrap_err();
        assert_eq!(err, MenuError::UnknownParent("child".to_string()));
    }

    #[test]
    fn second_farm_registration_leaves_shell_unchanged() {
        let registry = MenuRegistry::farm_admin(&PageDispatchers::new(Arc::new(StaticSettings)));
        let mut shell = AdminShell::new();
        registry.register(&mut shell, &Catalog::empty()).unwrap();
        assert_eq!(
            registry.register(&mut shell, &Catalog::empty()).unwrap_err(),
            MenuError::AlreadyRegistered
        );
        assert_eq!(shell.len(), 12);
    }

    #[test]
    fn dispatch_renders_top_level_and_dashboard_alike() {
        let shell = farm_shell();
        let theme = theme();
        let user = AdminUser::new("hand", [Capability::ManageFarm]);

        let top = shell
            .dispatch(TOP_LEVEL_SLUG, &user, &theme, tera::Context::new())
            .unwrap();
        let dashboard = shell
            .dispatch(slugs::DASHBOARD, &user, &theme, tera::Context::new())
            .unwrap();
        assert_eq!(top.body, "dashboard for hand");
        assert_eq!(top.body, dashboard.body);
        assert_eq!(dashboard.title, "Farm Dashboard");
    }

    #[test]
    fn dispatch_unknown_slug_is_not_found() {
        let shell = farm_shell();
        let user = AdminUser::admin("owner");
        let err = shell
            .dispatch("farm-weather", &user, &theme(), tera::Context::new())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn dispatch_without_capability_never_runs_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler: RenderHandler =
            Arc::new(move |_ctx: &mut PageContext<'_>| -> Result<(), RenderError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let mut shell = AdminShell::new();
        shell
            .register_top_level_page(
                registration("root", Capability::ManageFarm, text("r")),
                "icon",
                1,
            )
            .unwrap();
        shell
            .register_sub_page(
                "root",
                registration("config", Capability::ManageSettings, handler),
            )
            .unwrap();

        let user = AdminUser::new("hand", [Capability::ManageFarm]);
        let err = shell
            .dispatch("config", &user, &ThemeEngine::empty(), tera::Context::new())
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(Capability::ManageSettings)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispatch_surfaces_missing_template() {
        let shell = farm_shell();
        let user = AdminUser::admin("owner");
        let err = shell
            .dispatch(slugs::TASKS, &user, &theme(), tera::Context::new())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Render(RenderError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn navigation_hides_settings_pages_from_farm_staff() {
        let shell = farm_shell();
        let staff = AdminUser::new("hand", [Capability::ManageFarm]);

        let nav = shell.navigation(&staff, slugs::CROPS);
        assert_eq!(nav.len(), 1);
        let labels: Vec<_> = nav[0].children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels.len(), 9);
        assert!(!labels.contains(&"Settings"));
        assert!(!labels.contains(&"Email/SMTP"));

        let crops = nav[0].children.iter().find(|c| c.active).unwrap();
        assert_eq!(crops.slug, slugs::CROPS);
        assert_eq!(crops.url, "/admin/farm-crops");

        let owner = AdminUser::admin("owner");
        assert_eq!(shell.navigation(&owner, "")[0].children.len(), 11);
    }

    #[test]
    fn navigation_is_empty_without_capabilities() {
        let shell = farm_shell();
        let nobody = AdminUser::new("guest", Vec::<Capability>::new());
        assert!(shell.navigation(&nobody, "").is_empty());
    }
}
