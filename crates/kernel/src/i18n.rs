//! Interface string translation.
//!
//! Catalogs are TOML files with one table per text domain:
//!
//! ```toml
//! [farmdesk]
//! "Animals" = "Animaux"
//! "Crops" = "Cultures"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Text domain for the admin menu strings.
pub const TEXT_DOMAIN: &str = "farmdesk";

/// Looks up the localized form of an interface string.
pub trait Translator: Send + Sync {
    /// Translate `text` within `domain`, returning `text` itself when no
    /// translation exists.
    fn translate(&self, text: &str, domain: &str) -> String;
}

/// In-memory translation catalog keyed by domain.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    domains: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// A catalog with no translations; every lookup falls back to the source.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML.
    pub fn from_toml(source: &str) -> Result<Self> {
        let domains: HashMap<String, HashMap<String, String>> =
            toml::from_str(source).context("invalid translation catalog")?;
        Ok(Self { domains })
    }

    /// Load a catalog from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read translations {}", path.display()))?;
        let catalog = Self::from_toml(&source)?;
        info!(
            path = %path.display(),
            strings = catalog.len(),
            "loaded translation catalog"
        );
        Ok(catalog)
    }

    /// Total number of translated strings across all domains.
    pub fn len(&self) -> usize {
        self.domains.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Translator for Catalog {
    fn translate(&self, text: &str, domain: &str) -> String {
        self.domains
            .get(domain)
            .and_then(|strings| strings.get(text))
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}
