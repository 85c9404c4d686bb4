//! CLI command implementations.
//!
//! These commands run without starting the HTTP server or loading templates.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::i18n::Catalog;
use crate::settings::SiteSettings;
use crate::shell::{AdminShell, admin_url};
use crate::state::register_admin_menu;

/// One row of the `menu` listing.
#[derive(Debug, Serialize)]
pub struct MenuRow {
    pub slug: String,
    pub label: String,
    pub parent: Option<String>,
    pub capability: String,
    pub url: String,
}

/// Rows for every registered page, in registration order.
pub fn menu_rows(shell: &AdminShell) -> Vec<MenuRow> {
    shell
        .pages()
        .iter()
        .map(|page| MenuRow {
            slug: page.slug.clone(),
            label: page.label.clone(),
            parent: page.parent.clone(),
            capability: page.capability.to_string(),
            url: admin_url(&page.slug),
        })
        .collect()
}

/// Print the registered admin menu.
pub fn cmd_menu(config: &Config, json: bool) -> Result<()> {
    let catalog = match &config.translations_file {
        Some(path) => Catalog::load(path)?,
        None => Catalog::empty(),
    };
    let (_menu, shell) = register_admin_menu(&catalog, &SiteSettings::from_config(config))?;
    let rows = menu_rows(&shell);

    if json {
        let out = serde_json::to_string_pretty(&rows).context("failed to serialize menu")?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "{:<22} {:<18} {:<18} {:<16} {}",
        "SLUG", "LABEL", "PARENT", "CAPABILITY", "URL"
    );
    println!("{}", "-".repeat(100));

    for row in &rows {
        println!(
            "{:<22} {:<18} {:<18} {:<16} {}",
            row.slug,
            row.label,
            row.parent.as_deref().unwrap_or("-"),
            row.capability,
            row.url
        );
    }

    Ok(())
}
