//! Menu registry - the ordered set of farm admin pages.
//!
//! The entry set is built once and never mutated. Entry 0 is always the
//! top-level page; the rest are its children in display order.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::i18n::{TEXT_DOMAIN, Translator};
use crate::pages::{PageDispatchers, RenderHandler};
use crate::permissions::Capability;

use super::{MenuError, MenuHost, PageRegistration};

/// Slug of the top-level farm management page.
pub const TOP_LEVEL_SLUG: &str = "farm-management";
/// Icon shown next to the top-level menu label.
pub const TOP_LEVEL_ICON: &str = "dashicons-carrot";
/// Position of the top-level entry in the admin sidebar.
pub const TOP_LEVEL_POSITION: u32 = 25;

/// Child page slugs.
pub mod slugs {
    pub const DASHBOARD: &str = "farm-dashboard";
    pub const ANIMALS: &str = "farm-animals";
    pub const CROPS: &str = "farm-crops";
    pub const TASKS: &str = "farm-tasks";
    pub const INVENTORY: &str = "farm-inventory";
    pub const EXPENSES: &str = "farm-expenses";
    pub const VACCINATIONS: &str = "farm-vaccinations";
    pub const REPORTS: &str = "farm-reports";
    pub const FRONTEND_PAGES: &str = "farm-frontend-pages";
    pub const SMTP: &str = "farm-smtp";
    pub const SETTINGS: &str = "farm-settings";
}

/// One navigable admin page.
#[derive(Clone)]
pub struct MenuEntry {
    /// Unique across the whole menu.
    pub slug: String,
    /// Page title (source string, translated at registration).
    pub title: String,
    /// Menu label (source string, translated at registration).
    pub label: String,
    pub capability: Capability,
    pub handler: RenderHandler,
    /// `None` only for the top-level entry.
    pub parent: Option<String>,
}

impl MenuEntry {
    /// Create the top-level entry.
    pub fn top_level(
        slug: &str,
        title: &str,
        label: &str,
        capability: Capability,
        handler: RenderHandler,
    ) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            label: label.to_string(),
            capability,
            handler,
            parent: None,
        }
    }

    /// Create a child of `parent`.
    pub fn child(
        parent: &str,
        slug: &str,
        title: &str,
        label: &str,
        capability: Capability,
        handler: RenderHandler,
    ) -> Self {
        Self {
            parent: Some(parent.to_string()),
            ..Self::top_level(slug, title, label, capability, handler)
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    fn registration(&self, translator: &dyn Translator) -> PageRegistration {
        PageRegistration {
            slug: self.slug.clone(),
            title: translator.translate(&self.title, TEXT_DOMAIN),
            label: translator.translate(&self.label, TEXT_DOMAIN),
            capability: self.capability,
            handler: self.handler.clone(),
        }
    }
}

impl std::fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEntry")
            .field("slug", &self.slug)
            .field("title", &self.title)
            .field("label", &self.label)
            .field("capability", &self.capability)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered set of admin menu entries.
#[derive(Debug)]
pub struct MenuRegistry {
    entries: Vec<MenuEntry>,
    /// Set on the first call to [`MenuRegistry::register`].
    registered: AtomicBool,
}

impl MenuRegistry {
    /// The farm admin menu.
    ///
    /// The top-level entry and the Dashboard entry share `pages.dashboard`.
    /// Email/SMTP and Settings need [`Capability::ManageSettings`]; every
    /// other page needs [`Capability::ManageFarm`].
    pub fn farm_admin(pages: &PageDispatchers) -> Self {
        use Capability::{ManageFarm, ManageSettings};

        let children = [
            (slugs::DASHBOARD, "Farm Dashboard", "Dashboard", ManageFarm, &pages.dashboard),
            (slugs::ANIMALS, "Animals", "Animals", ManageFarm, &pages.animals),
            (slugs::CROPS, "Crops", "Crops", ManageFarm, &pages.crops),
            (slugs::TASKS, "Tasks", "Tasks", ManageFarm, &pages.tasks),
            (slugs::INVENTORY, "Inventory", "Inventory", ManageFarm, &pages.inventory),
            (slugs::EXPENSES, "Expenses", "Expenses", ManageFarm, &pages.expenses),
            (slugs::VACCINATIONS, "Vaccinations", "Vaccinations", ManageFarm, &pages.vaccinations),
            (slugs::REPORTS, "Reports", "Reports", ManageFarm, &pages.reports),
            (
                slugs::FRONTEND_PAGES,
                "Frontend Pages",
                "Frontend Pages",
                ManageFarm,
                &pages.frontend_pages,
            ),
            (slugs::SMTP, "Email / SMTP Settings", "Email/SMTP", ManageSettings, &pages.smtp),
            (slugs::SETTINGS, "Farm Settings", "Settings", ManageSettings, &pages.settings),
        ];

        let mut entries = Vec::with_capacity(children.len() + 1);
        entries.push(MenuEntry::top_level(
            TOP_LEVEL_SLUG,
            "Farm Management",
            "Farm Management",
            ManageFarm,
            pages.dashboard.clone(),
        ));
        entries.extend(
            children
                .into_iter()
                .map(|(slug, title, label, capability, handler)| {
                    MenuEntry::child(
                        TOP_LEVEL_SLUG,
                        slug,
                        title,
                        label,
                        capability,
                        handler.clone(),
                    )
                }),
        );

        debug_assert!(validate(&entries).is_ok(), "farm admin menu is malformed");
        Self::unchecked(entries)
    }

    /// Build a registry from arbitrary entries, checking the tree shape.
    ///
    /// The first entry must be the only top-level one; every other entry must
    /// name it as parent; slugs must be unique.
    #[cfg(test)]
    fn from_entries(entries: Vec<MenuEntry>) -> Result<Self, MenuError> {
        validate(&entries)?;
        Ok(Self::unchecked(entries))
    }

    fn unchecked(entries: Vec<MenuEntry>) -> Self {
        debug!(entries = entries.len(), "built menu registry");
        Self {
            entries,
            registered: AtomicBool::new(false),
        }
    }

    /// Hand every entry to `host`, top-level first, children in order.
    ///
    /// Only the first call reaches the host; later calls fail with
    /// [`MenuError::AlreadyRegistered`]. Host errors are returned as-is.
    pub fn register(
        &self,
        host: &mut dyn MenuHost,
        translator: &dyn Translator,
    ) -> Result<(), MenuError> {
        if self.registered.swap(true, Ordering::SeqCst) {
            warn!("menu registration attempted twice; ignoring");
            return Err(MenuError::AlreadyRegistered);
        }

        let top = self.top_level().ok_or(MenuError::MissingTopLevel)?;
        host.register_top_level_page(
            top.registration(translator),
            TOP_LEVEL_ICON,
            TOP_LEVEL_POSITION,
        )?;

        for child in self.children() {
            host.register_sub_page(&top.slug, child.registration(translator))?;
        }

        info!(
            top_level = %top.slug,
            pages = self.entries.len(),
            "registered admin menu"
        );
        Ok(())
    }

    /// Whether [`MenuRegistry::register`] has been called.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn top_level(&self) -> Option<&MenuEntry> {
        self.entries.first().filter(|e| e.is_top_level())
    }

    /// Child entries in display order.
    pub fn children(&self) -> &[MenuEntry] {
        self.entries.get(1..).unwrap_or_default()
    }

    /// Get an entry by slug.
    pub fn get(&self, slug: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(entries: &[MenuEntry]) -> Result<(), MenuError> {
    let top = entries.first().ok_or(MenuError::MissingTopLevel)?;
    if !top.is_top_level() {
        return Err(MenuError::MissingTopLevel);
    }

    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        if !seen.insert(entry.slug.as_str()) {
            return Err(MenuError::DuplicateSlug(entry.slug.clone()));
        }
        if index == 0 {
            continue;
        }
        match &entry.parent {
            None => return Err(MenuError::MultipleTopLevel(entry.slug.clone())),
            Some(parent) if *parent != top.slug => {
                return Err(MenuError::UnknownParent(parent.clone()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
