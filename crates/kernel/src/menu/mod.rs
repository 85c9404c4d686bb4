//! Admin menu registry.
//!
//! The registry declares the farm admin pages (one top-level entry and its
//! ordered children), each bound to a required [`Capability`] and a render
//! handler, and hands them to a [`MenuHost`] exactly once at start-up.
//!
//! [`Capability`]: crate::permissions::Capability

mod host;
mod registry;

pub use host::{MenuHost, PageRegistration};
pub use registry::{
    MenuEntry, MenuRegistry, TOP_LEVEL_ICON, TOP_LEVEL_POSITION, TOP_LEVEL_SLUG, slugs,
};

use thiserror::Error;

/// Menu construction and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("menu already registered")]
    AlreadyRegistered,

    #[error("duplicate menu slug: {0}")]
    DuplicateSlug(String),

    #[error("unknown parent menu: {0}")]
    UnknownParent(String),

    #[error("menu has no top-level entry")]
    MissingTopLevel,

    #[error("menu has more than one top-level entry: {0}")]
    MultipleTopLevel(String),
}
