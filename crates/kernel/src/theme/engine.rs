//! Theme engine with Tera templates and suggestion resolution.

use std::path::Path;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use crate::pages::RenderError;

/// Fallback layout wrapping every admin page.
pub const ADMIN_LAYOUT: &str = "admin/layout.html";

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        anyhow::ensure!(
            template_dir.is_dir(),
            "template directory {} does not exist",
            template_dir.display()
        );

        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine from in-memory `(name, source)` templates.
    pub fn from_raw_templates(templates: &[(&str, &str)]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .context("failed to parse templates")?;
        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with no templates (for testing).
    pub fn empty() -> Self {
        Self {
            tera: Tera::default(),
            suggestion_cache: DashMap::new(),
        }
    }

    /// Whether a template with this exact name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template(name).is_ok()
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Results are cached for performance.
    ///
    /// Example suggestions: `["admin/page--farm-crops", "admin/layout"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");

        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.has_template(&template_name) {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }

            // Also try without .html extension (in case suggestion already has it)
            if self.has_template(suggestion) {
                let name = (*suggestion).to_string();
                self.suggestion_cache.insert(cache_key, name.clone());
                return Some(name);
            }
        }

        // Negative results are not cached
        None
    }

    /// Layout suggestions for an admin page, most specific first.
    ///
    /// `farm-crops` -> `["admin/page--farm-crops", "admin/layout"]`
    pub fn page_suggestions(slug: &str) -> Vec<String> {
        let mut suggestions = Vec::new();
        let normalized = slug.trim_matches('/').replace('/', "--");
        if !normalized.is_empty() {
            suggestions.push(format!("admin/page--{normalized}"));
        }
        suggestions.push("admin/layout".to_string());
        suggestions
    }

    /// Render a template by exact name.
    ///
    /// A template that is not loaded is a [`RenderError::TemplateMissing`],
    /// never an empty string.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, RenderError> {
        if !self.has_template(template) {
            return Err(RenderError::TemplateMissing {
                template: template.to_string(),
            });
        }
        Ok(self.tera.render(template, context)?)
    }

    /// Wrap rendered page content in the admin layout.
    ///
    /// The context should already hold the navigation and site variables;
    /// `title`, `content` and `slug` are added here.
    pub fn render_page(
        &self,
        slug: &str,
        title: &str,
        content: &str,
        context: &mut tera::Context,
    ) -> Result<String, RenderError> {
        let suggestions = Self::page_suggestions(slug);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(|s| s.as_str()).collect();

        let template = self
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| ADMIN_LAYOUT.to_string());

        context.insert("title", title);
        context.insert("content", content);
        context.insert("slug", slug);

        self.render(&template, context)
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .field("cache_size", &self.suggestion_cache.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_suggestions() {
        assert_eq!(
            ThemeEngine::page_suggestions("farm-crops"),
            vec!["admin/page--farm-crops", "admin/layout"]
        );
        assert_eq!(ThemeEngine::page_suggestions(""), vec!["admin/layout"]);
    }

    #[test]
    fn resolve_prefers_page_specific_layout() {
        let engine = ThemeEngine::from_raw_templates(&[
            ("admin/layout.html", "layout"),
            ("admin/page--farm-crops.html", "crops layout"),
        ])
        .unwrap();

        assert_eq!(
            engine.resolve_template(&["admin/page--farm-crops", "admin/layout"]),
            Some("admin/page--farm-crops.html".to_string())
        );
        assert_eq!(
            engine.resolve_template(&["admin/page--farm-tasks", "admin/layout"]),
            Some("admin/layout.html".to_string())
        );
    }

    #[test]
    fn render_missing_template_is_an_error() {
        let engine = ThemeEngine::empty();
        let err = engine
            .render("admin/dashboard.html", &tera::Context::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::TemplateMissing { ref template } if template == "admin/dashboard.html"
        ));
    }

    #[test]
    fn render_page_inserts_title_and_content() {
        let engine = ThemeEngine::from_raw_templates(&[(
            "admin/layout.html",
            "<h1>{{ title }}</h1>{{ content | safe }}",
        )])
        .unwrap();
        let mut ctx = tera::Context::new();
        let html = engine
            .render_page("farm-tasks", "Tasks", "<p>todo</p>", &mut ctx)
            .unwrap();
        assert_eq!(html, "<h1>Tasks</h1><p>todo</p>");
    }

    #[test]
    fn missing_template_dir_is_rejected() {
        assert!(ThemeEngine::new(Path::new("/nonexistent/templates")).is_err());
    }
}
