//! Settings page renderer.
//!
//! The Settings admin page does not include a template directly; it forwards
//! to a [`SettingsRenderer`]. The stock implementation shows the configured
//! site and email settings read-only.

use serde::Serialize;

use crate::config::Config;
use crate::pages::{PageContext, RenderError, templates};

/// Render entry point for the settings page.
pub trait SettingsRenderer: Send + Sync {
    /// Write the settings page body into `ctx`.
    fn render_settings_page(&self, ctx: &mut PageContext<'_>) -> Result<(), RenderError>;
}

/// Site-wide settings as configured at start-up.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_url: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_encryption: String,
    pub smtp_from_email: String,
}

impl SiteSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_name: config.site_name.clone(),
            site_url: config.site_url.clone(),
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            smtp_encryption: config.smtp_encryption.clone(),
            smtp_from_email: config.smtp_from_email.clone(),
        }
    }

    /// Whether outgoing email is configured.
    pub fn email_enabled(&self) -> bool {
        self.smtp_host.is_some()
    }

    /// Settings grouped for display.
    pub fn sections(&self) -> Vec<SettingsSection> {
        let smtp_host = self
            .smtp_host
            .clone()
            .unwrap_or_else(|| "(disabled)".to_string());

        vec![
            SettingsSection {
                title: "General",
                fields: vec![
                    SettingsField::new("Site name", &self.site_name),
                    SettingsField::new("Site URL", &self.site_url),
                ],
            },
            SettingsSection {
                title: "Email",
                fields: vec![
                    SettingsField::new("SMTP host", &smtp_host),
                    SettingsField::new("SMTP port", &self.smtp_port.to_string()),
                    SettingsField::new("Encryption", &self.smtp_encryption),
                    SettingsField::new("From address", &self.smtp_from_email),
                ],
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsSection {
    pub title: &'static str,
    pub fields: Vec<SettingsField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsField {
    pub label: &'static str,
    pub value: String,
}

impl SettingsField {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Renders `admin/settings.html` with [`SiteSettings::sections`].
#[derive(Debug, Clone)]
pub struct SiteSettingsPage {
    settings: SiteSettings,
}

impl SiteSettingsPage {
    pub fn new(settings: SiteSettings) -> Self {
        Self { settings }
    }
}

impl SettingsRenderer for SiteSettingsPage {
    fn render_settings_page(&self, ctx: &mut PageContext<'_>) -> Result<(), RenderError> {
        ctx.vars_mut()
            .insert("sections", &self.settings.sections());
        ctx.vars_mut()
            .insert("email_enabled", &self.settings.email_enabled());
        ctx.include_template(templates::SETTINGS)
    }
}
