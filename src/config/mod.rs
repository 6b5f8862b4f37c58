//! Configuration management
//!
//! This module handles loading and parsing configuration for the lab website.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. The loaded
//! configuration is read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Site defaults (meta tags)
    #[serde(default)]
    pub site: SiteConfig,
    /// Third-party API credentials and endpoints
    #[serde(default)]
    pub social: SocialConfig,
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
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
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
    "data/labsite.db".to_string()
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

/// Cache configuration for fetched social feeds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached entries
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_ttl() -> u64 {
    600
}

fn default_max_capacity() -> u64 {
    1_000
}

/// Default values used when building page meta tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_description")]
    pub default_description: String,
    #[serde(default = "default_keywords")]
    pub default_keywords: Vec<String>,
    #[serde(default = "default_logo_url")]
    pub default_logo_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            default_description: default_description(),
            default_keywords: default_keywords(),
            default_logo_url: default_logo_url(),
        }
    }
}

fn default_title() -> String {
    "Lab Website".to_string()
}

fn default_description() -> String {
    "News, events and publications of the lab".to_string()
}

fn default_keywords() -> Vec<String> {
    vec!["research".to_string(), "open source".to_string()]
}

fn default_logo_url() -> String {
    "/static/images/logo.png".to_string()
}

/// Credentials and endpoints for the third-party APIs
///
/// Base URLs are configurable so the fetchers can be pointed at a fake
/// server in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    /// Organisation path on GitHub, e.g. `/orgs/nipy/`
    #[serde(default = "default_repository_url")]
    pub repository_url: String,
    /// Repository whose permissions guard the admin API
    #[serde(default = "default_repository_name")]
    pub repository_name: String,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default)]
    pub facebook_app_id: String,
    #[serde(default)]
    pub facebook_app_secret: String,
    #[serde(default)]
    pub twitter_consumer_key: String,
    #[serde(default)]
    pub twitter_consumer_secret: String,
    /// Request timeout for outbound calls, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_github_api")]
    pub github_api: String,
    #[serde(default = "default_google_api")]
    pub google_api: String,
    #[serde(default = "default_facebook_api")]
    pub facebook_api: String,
    #[serde(default = "default_twitter_api")]
    pub twitter_api: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            repository_name: default_repository_name(),
            google_api_key: String::new(),
            facebook_app_id: String::new(),
            facebook_app_secret: String::new(),
            twitter_consumer_key: String::new(),
            twitter_consumer_secret: String::new(),
            timeout_seconds: default_timeout_seconds(),
            github_api: default_github_api(),
            google_api: default_google_api(),
            facebook_api: default_facebook_api(),
            twitter_api: default_twitter_api(),
        }
    }
}

fn default_repository_url() -> String {
    "/orgs/nipy/".to_string()
}

fn default_repository_name() -> String {
    "dipy.org".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_google_api() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_facebook_api() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_twitter_api() -> String {
    "https://api.twitter.com".to_string()
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
    ParseError {
        path: String,
        message: String,
    },
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

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - LABSITE_SERVER_HOST, LABSITE_SERVER_PORT, LABSITE_SERVER_CORS_ORIGIN
    /// - LABSITE_DATABASE_DRIVER, LABSITE_DATABASE_URL
    /// - LABSITE_CACHE_TTL_SECONDS
    /// - LABSITE_GOOGLE_API_KEY
    /// - LABSITE_FACEBOOK_APP_ID, LABSITE_FACEBOOK_APP_SECRET
    /// - LABSITE_TWITTER_CONSUMER_KEY, LABSITE_TWITTER_CONSUMER_SECRET
    /// - LABSITE_REPOSITORY_NAME
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("LABSITE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LABSITE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("LABSITE_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("LABSITE_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("LABSITE_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(ttl) = std::env::var("LABSITE_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.cache.ttl_seconds = ttl;
            }
        }

        // Secrets are usually injected by the environment rather than the file
        let secrets: [(&str, &mut String); 6] = [
            ("LABSITE_GOOGLE_API_KEY", &mut self.social.google_api_key),
            ("LABSITE_FACEBOOK_APP_ID", &mut self.social.facebook_app_id),
            ("LABSITE_FACEBOOK_APP_SECRET", &mut self.social.facebook_app_secret),
            ("LABSITE_TWITTER_CONSUMER_KEY", &mut self.social.twitter_consumer_key),
            ("LABSITE_TWITTER_CONSUMER_SECRET", &mut self.social.twitter_consumer_secret),
            ("LABSITE_REPOSITORY_NAME", &mut self.social.repository_name),
        ];
        for (key, field) in secrets {
            if let Ok(value) = std::env::var(key) {
                *field = value;
            }
        }
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

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_site_strategy() -> impl Strategy<Value = SiteConfig> {
        (
            "[A-Za-z][A-Za-z ]{0,20}",
            "[A-Za-z][A-Za-z ,.]{0,40}",
            prop::collection::vec("[a-z]{2,10}", 0..5),
            "/[a-z]{1,10}/[a-z]{1,10}\\.png",
        )
            .prop_map(|(title, description, keywords, logo)| SiteConfig {
                default_title: title,
                default_description: description,
                default_keywords: keywords,
                default_logo_url: logo,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and loading it back preserves it.
        #[test]
        fn config_yaml_roundtrip(site in valid_site_strategy(), port in 1024u16..65535, ttl in 1u64..86400) {
            let mut config = Config::default();
            config.site = site;
            config.server.port = port;
            config.cache.ttl_seconds = ttl;

            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.site.default_title, parsed.site.default_title);
            prop_assert_eq!(config.site.default_description, parsed.site.default_description);
            prop_assert_eq!(config.site.default_keywords, parsed.site.default_keywords);
            prop_assert_eq!(config.site.default_logo_url, parsed.site.default_logo_url);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(config.cache.ttl_seconds, parsed.cache.ttl_seconds);
        }
    }
}
