//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Path to the template directory (default: ./templates).
    pub templates_dir: PathBuf,

    /// Path to the admin users file (default: ./users.toml).
    pub users_file: PathBuf,

    /// Optional translation catalog. When None, menu strings are shown as-is.
    pub translations_file: Option<PathBuf>,

    /// Site name shown in the admin header (default: "Farmdesk").
    pub site_name: String,

    /// Public site URL.
    pub site_url: String,

    /// SMTP host for outgoing email. When None, email is reported as disabled.
    pub smtp_host: Option<String>,

    /// SMTP port (default: 587).
    pub smtp_port: u16,

    /// SMTP encryption mode: "starttls" (default), "tls", or "none".
    pub smtp_encryption: String,

    /// From address for outgoing email.
    pub smtp_from_email: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let templates_dir = env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./templates"));

        let users_file = env::var("USERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./users.toml"));

        let translations_file = env::var("TRANSLATIONS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Farmdesk".to_string());

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let smtp_host = env::var("SMTP_HOST").ok().filter(|v| !v.is_empty());

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT must be a valid u16")?;

        let smtp_encryption = env::var("SMTP_ENCRYPTION")
            .unwrap_or_else(|_| "starttls".to_string())
            .to_lowercase();

        let smtp_from_email =
            env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| "noreply@localhost".to_string());

        Ok(Self {
            port,
            templates_dir,
            users_file,
            translations_file,
            site_name,
            site_url,
            smtp_host,
            smtp_port,
            smtp_encryption,
            smtp_from_email,
        })
    }
}
