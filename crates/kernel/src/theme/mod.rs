//! Theme engine and template rendering.
//!
//! Provides Tera-based template rendering with per-page layout suggestions.

mod engine;

pub use engine::ThemeEngine;
