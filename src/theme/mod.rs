//! Template engine
//!
//! Pages are rendered with Tera. The stock templates are compiled into the
//! binary; any `.html` file under the configured override directory replaces
//! the embedded template with the same relative name.

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_embed::RustEmbed;
use serde::Serialize;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

const ERROR_TEMPLATE: &str = "error.html";
const RENDER_FAILED: &str = "The page could not be displayed.";

mod error;

pub use error::ThemeError;

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// Template engine for rendering pages
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load the embedded templates, then overrides from `override_path` if
    /// that directory exists.
    pub fn new(override_path: &Path) -> Result<Self> {
        let mut templates = embedded_templates()?;

        if override_path.is_dir() {
            let mut overrides = Vec::new();
            collect_templates_from_dir(override_path, override_path, &mut overrides)?;
            for (name, content) in overrides {
                tracing::info!("Template override: {}", name);
                templates.retain(|(n, _)| n != &name);
                templates.push((name, content));
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", e)))?;

        Ok(Self { tera })
    }

    /// Engine with only the embedded templates
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(embedded_templates()?)
            .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", e)))?;
        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        if !self.has_template(template) {
            return Err(ThemeError::NotFound(template.to_string()).into());
        }

        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            ThemeError::TemplateError(error_msg).into()
        })
    }

    /// Render with the standard variables added to `context`
    pub fn render_page(
        &self,
        template: &str,
        context: &TeraContext,
        vars: &StandardTemplateVars,
    ) -> Result<String> {
        let mut full_context = context.clone();
        full_context.insert("site_name", &vars.site_name);
        full_context.insert("media_url", &vars.media_url);
        full_context.insert("request_path", &vars.request_path);
        full_context.insert("year", &vars.year);
        self.render(template, &full_context)
    }

    /// Render a page; on failure render `error.html`, and if that fails
    /// too, a bare HTML page. Always returns markup.
    pub fn render_with_fallback(
        &self,
        template: &str,
        context: &TeraContext,
        vars: &StandardTemplateVars,
    ) -> String {
        let err = match self.render_page(template, context, vars) {
            Ok(html) => return html,
            Err(e) => e,
        };
        tracing::warn!("Failed to render template '{}': {:#}", template, err);

        if template != ERROR_TEMPLATE {
            let mut error_context = context.clone();
            error_context.insert("error_message", RENDER_FAILED);
            error_context.insert("status", &500);

            match self.render_page(ERROR_TEMPLATE, &error_context, vars) {
                Ok(html) => return html,
                Err(e) => tracing::warn!("Failed to render error template: {:#}", e),
            }
            return simple_error_page(RENDER_FAILED);
        }

        let message = context
            .get("error_message")
            .and_then(|v| v.as_str())
            .unwrap_or(RENDER_FAILED);
        simple_error_page(message)
    }
}

/// Last-resort page when even the error template fails
pub fn simple_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Error</title></head>\
         <body><h1>Error</h1><p>{}</p></body></html>",
        tera::escape_html(message)
    )
}

fn embedded_templates() -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();
    for name in EmbeddedTemplates::iter() {
        let file = EmbeddedTemplates::get(&name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
        let content = String::from_utf8(file.data.into_owned())
            .with_context(|| format!("Template is not UTF-8: {}", name))?;
        templates.push((name.replace('\\', "/"), content));
    }
    Ok(templates)
}

fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(current_path).map_err(ThemeError::from)? {
        let path = entry.map_err(ThemeError::from)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;
            let name = relative_path.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;
            templates.push((name, content));
        }
    }
    Ok(())
}

/// Variables every page receives
#[derive(Debug, Clone, Serialize)]
pub struct StandardTemplateVars {
    pub site_name: String,
    /// Prefix for stored image references
    pub media_url: String,
    pub request_path: String,
    /// Current year (for the footer)
    pub year: i32,
}

impl StandardTemplateVars {
    pub fn new(
        site_name: impl Into<String>,
        media_url: impl Into<String>,
        request_path: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            media_url: media_url.into().trim_end_matches('/').to_string(),
            request_path: request_path.into(),
            year: chrono::Utc::now().year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES: &[&str] = &[
        "index.html",
        "news.html",
        "detail.html",
        "teachers_list.html",
        "error.html",
        "admin_panel/login.html",
        "admin_panel/dashboard.html",
        "admin_panel/school_info.html",
        "admin_panel/teachers.html",
        "admin_panel/edit_teacher.html",
        "admin_panel/news.html",
        "admin_panel/edit_news.html",
        "admin_panel/categories.html",
        "admin_panel/edit_category.html",
    ];

    #[test]
    fn test_embedded_templates_load() {
        let engine = ThemeEngine::embedded().expect("embedded templates parse");
        for page in PAGES {
            assert!(engine.has_template(page), "missing template {}", page);
        }
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let engine = ThemeEngine::embedded().unwrap();
        let err = engine.render("nope.html", &TeraContext::new()).unwrap_err();
        assert!(err.to_string().contains("nope.html"));
    }

    #[test]
    fn test_override_directory_replaces_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("error.html"), "custom {{ error_message }}").unwrap();

        let engine = ThemeEngine::new(dir.path()).unwrap();
        let mut context = TeraContext::new();
        context.insert("error_message", "boom");
        assert_eq!(engine.render("error.html", &context).unwrap(), "custom boom");
        assert!(engine.has_template("index.html"));
    }

    fn vars() -> StandardTemplateVars {
        StandardTemplateVars {
            site_name: "School".to_string(),
            media_url: "/media".to_string(),
            request_path: "/".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn test_render_with_fallback_never_fails() {
        let engine = ThemeEngine::embedded().unwrap();
        let html = engine.render_with_fallback("missing.html", &TeraContext::new(), &vars());
        assert!(html.contains("could not be displayed"));
    }

    #[test]
    fn test_render_with_fallback_bare_page_keeps_message() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("error.html"), "{{ missing_variable }}").unwrap();
        let engine = ThemeEngine::new(dir.path()).unwrap();

        let mut context = TeraContext::new();
        context.insert("error_message", "No such <news>");
        let html = engine.render_with_fallback("error.html", &context, &vars());
        assert!(html.contains("No such &lt;news&gt;"));
    }

    #[test]
    fn test_simple_error_page_escapes() {
        let html = simple_error_page("<script>");
        assert!(html.contains("&lt;script&gt;"));
    }
}
