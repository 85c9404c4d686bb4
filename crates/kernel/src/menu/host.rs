//! Interface the registry uses to hand pages to the admin shell.

use crate::pages::RenderHandler;
use crate::permissions::Capability;

use super::MenuError;

/// One page as handed to the host: strings are already translated.
#[derive(Clone)]
pub struct PageRegistration {
    pub slug: String,
    pub title: String,
    pub label: String,
    pub capability: Capability,
    pub handler: RenderHandler,
}

impl std::fmt::Debug for PageRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistration")
            .field("slug", &self.slug)
            .field("title", &self.title)
            .field("label", &self.label)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Menu registration surface of the admin shell.
pub trait MenuHost {
    /// Register a top-level page shown with `icon` at menu `position`.
    fn register_top_level_page(
        &mut self,
        page: PageRegistration,
        icon: &str,
        position: u32,
    ) -> Result<(), MenuError>;

    /// Register a page nested under the top-level page `parent_slug`.
    fn register_sub_page(
        &mut self,
        parent_slug: &str,
        page: PageRegistration,
    ) -> Result<(), MenuError>;
}
