//! Configuration management
//!
//! This module handles loading and parsing configuration for the school site.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. The admin secret
//! and the contact destination are read once at startup and never reloaded.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Public site configuration
    #[serde(default)]
    pub site: SiteConfig,
    /// Admin panel configuration
    #[serde(default)]
    pub admin: AdminConfig,
    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Template configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Content ordering configuration
    #[serde(default)]
    pub content: ContentConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/schoolsite.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Public site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Name shown in page titles and headers
    #[serde(default = "default_site_name")]
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
        }
    }
}

fn default_site_name() -> String {
    "School".to_string()
}

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared admin secret compared against the login form
    #[serde(default)]
    pub password: String,
    /// Session cookie lifetime in seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            session_max_age_secs: default_session_max_age(),
        }
    }
}

fn default_session_max_age() -> i64 {
    14 * 24 * 60 * 60
}

/// Mail transport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Write messages to the log instead of sending them (default)
    #[default]
    Log,
    /// Deliver through an SMTP relay
    Smtp,
}

/// Outbound mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transport used for the contact relay
    #[serde(default)]
    pub transport: MailTransport,
    /// Fixed destination of contact form messages
    #[serde(default = "default_contact_recipient")]
    pub contact_recipient: String,
    /// Sender address used in the From header
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Subject of contact form messages
    #[serde(default = "default_subject")]
    pub subject: String,
    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::default(),
            contact_recipient: default_contact_recipient(),
            from_address: default_from_address(),
            subject: default_subject(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
        }
    }
}

fn default_contact_recipient() -> String {
    "contact@school.local".to_string()
}

fn default_from_address() -> String {
    "noreply@school.local".to_string()
}

fn default_subject() -> String {
    "New contact from the website".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Media root directory
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// URL prefix the media root is served under
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    /// Maximum file size in bytes (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed image MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            url_prefix: default_url_prefix(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("media")
}

fn default_url_prefix() -> String {
    "/media".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }

    /// Get file extension for a MIME type
    pub fn get_extension(&self, mime_type: &str) -> &'static str {
        match mime_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory whose templates override the embedded ones
    #[serde(default = "default_theme_path")]
    pub path: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            path: default_theme_path(),
        }
    }
}

fn default_theme_path() -> PathBuf {
    PathBuf::from("templates")
}

/// Content ordering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Number of teachers featured on the home page
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
    /// Number of news items shown on the home page
    #[serde(default = "default_recent_news_limit")]
    pub recent_news_limit: usize,
    /// Category names whose members are featured first, in priority order
    #[serde(default = "default_featured_categories")]
    pub featured_categories: Vec<String>,
    /// Category names in teacher directory order
    #[serde(default = "default_directory_order")]
    pub directory_order: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            featured_limit: default_featured_limit(),
            recent_news_limit: default_recent_news_limit(),
            featured_categories: default_featured_categories(),
            directory_order: default_directory_order(),
        }
    }
}

fn default_featured_limit() -> usize {
    4
}

fn default_recent_news_limit() -> usize {
    3
}

fn default_featured_categories() -> Vec<String> {
    vec!["Maktab direktori".to_string(), "Rahbariyat".to_string()]
}

fn default_directory_order() -> Vec<String> {
    vec![
        "Maktab direktori".to_string(),
        "Rahbariyat".to_string(),
        "Fan o'qituvchisi".to_string(),
        "Boshlang'ich sinf o'qituvchisi".to_string(),
    ]
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - SCHOOLSITE_SERVER_HOST
    /// - SCHOOLSITE_SERVER_PORT
    /// - SCHOOLSITE_DATABASE_DRIVER
    /// - SCHOOLSITE_DATABASE_URL
    /// - SCHOOLSITE_ADMIN_PASSWORD
    /// - SCHOOLSITE_MAIL_TRANSPORT
    /// - SCHOOLSITE_MAIL_CONTACT_RECIPIENT
    /// - SCHOOLSITE_MAIL_SMTP_HOST / _PORT / _USERNAME / _PASSWORD
    /// - SCHOOLSITE_UPLOAD_PATH
    /// - SCHOOLSITE_THEME_PATH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SCHOOLSITE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SCHOOLSITE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(driver) = std::env::var("SCHOOLSITE_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("SCHOOLSITE_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(password) = std::env::var("SCHOOLSITE_ADMIN_PASSWORD") {
            self.admin.password = password;
        }

        if let Ok(transport) = std::env::var("SCHOOLSITE_MAIL_TRANSPORT") {
            match transport.to_lowercase().as_str() {
                "log" => self.mail.transport = MailTransport::Log,
                "smtp" => self.mail.transport = MailTransport::Smtp,
                _ => {}
            }
        }
        if let Ok(recipient) = std::env::var("SCHOOLSITE_MAIL_CONTACT_RECIPIENT") {
            self.mail.contact_recipient = recipient;
        }
        if let Ok(host) = std::env::var("SCHOOLSITE_MAIL_SMTP_HOST") {
            self.mail.smtp_host = host;
        }
        if let Ok(port) = std::env::var("SCHOOLSITE_MAIL_SMTP_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.mail.smtp_port = port;
            }
        }
        if let Ok(username) = std::env::var("SCHOOLSITE_MAIL_SMTP_USERNAME") {
            self.mail.smtp_username = username;
        }
        if let Ok(password) = std::env::var("SCHOOLSITE_MAIL_SMTP_PASSWORD") {
            self.mail.smtp_password = password;
        }

        if let Ok(path) = std::env::var("SCHOOLSITE_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("SCHOOLSITE_THEME_PATH") {
            self.theme.path = PathBuf::from(path);
        }
    }

    /// Check the settings the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "admin.password must be set (or SCHOOLSITE_ADMIN_PASSWORD)".to_string(),
            ));
        }
        if self.mail.contact_recipient.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "mail.contact_recipient must not be empty".to_string(),
            ));
        }
        if self.mail.transport == MailTransport::Smtp && self.mail.smtp_host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "mail.smtp_host is required when mail.transport is smtp".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
