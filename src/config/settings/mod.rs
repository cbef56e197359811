
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const API_URL_ENV: &str = "INDIA_FACTS_API_URL";
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "india-facts";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Knowledge API backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// News search upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub max_articles: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            max_articles: 10,
        }
    }
}

/// Generative-language upstream used for per-state headlines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub cache_ttl_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-flash-latest".to_string(),
            cache_ttl_seconds: 86_400,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid timeout: {0} (must be between 1 and 300 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid article limit: {0} (must be between 1 and 100)")]
    InvalidArticleLimit(usize),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid cache TTL: {0} (must be at most 604800 seconds)")]
    InvalidCacheTtl(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<ConfigError> for crate::PortalError {
    #[inline]
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Config {
    /// Platform configuration directory for the application
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load `config.toml` from `config_dir`, falling back to defaults when the
    /// file does not exist. Environment overrides are applied afterwards.
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Self::default()
        };
        config.base_dir = config_dir.as_ref().to_path_buf();
        config.apply_env_overrides();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    /// Load from the platform configuration directory
    #[inline]
    pub fn load_default() -> Result<Self> {
        let dir = Self::config_dir()?;
        Self::load(dir)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Environment variables take precedence over the file
    #[inline]
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(API_URL_ENV) {
            self.api.base_url = url;
        }
        if let Some(key) = non_empty_env(NEWS_API_KEY_ENV) {
            self.news.api_key = Some(key);
        }
        if let Some(key) = non_empty_env(GEMINI_API_KEY_ENV) {
            self.gemini.api_key = Some(key);
        }
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join(CONFIG_FILE_NAME)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.news.validate()?;
        self.gemini.validate()?;
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidProtocol(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Append `path` to `base` without discarding any path prefix on the base
fn join_path(base: &str, path: &str) -> Result<Url, ConfigError> {
    parse_http_url(&format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

impl ApiConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url(&self.base_url)?;

        if !(1..=300).contains(&self.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }

        Ok(())
    }

    /// `GET` endpoint for the full knowledge collection
    #[inline]
    pub fn knowledge_url(&self) -> Result<Url, ConfigError> {
        join_path(&self.base_url, "api/knowledge")
    }

    /// `POST` endpoint for validated knowledge submissions
    #[inline]
    pub fn validate_add_url(&self) -> Result<Url, ConfigError> {
        join_path(&self.base_url, "api/knowledge/validate-add")
    }

    #[inline]
    pub fn set_base_url(&mut self, base_url: String) -> Result<(), ConfigError> {
        parse_http_url(&base_url)?;
        self.base_url = base_url;
        Ok(())
    }

    #[inline]
    pub fn set_timeout_seconds(&mut self, timeout_seconds: u64) -> Result<(), ConfigError> {
        if !(1..=300).contains(&timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(timeout_seconds));
        }
        self.timeout_seconds = timeout_seconds;
        Ok(())
    }
}

impl NewsConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url(&self.endpoint)?;

        if !(1..=100).contains(&self.max_articles) {
            return Err(ConfigError::InvalidArticleLimit(self.max_articles));
        }

        Ok(())
    }

    #[inline]
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        parse_http_url(&self.endpoint)
    }

    #[inline]
    pub fn set_max_articles(&mut self, max_articles: usize) -> Result<(), ConfigError> {
        if !(1..=100).contains(&max_articles) {
            return Err(ConfigError::InvalidArticleLimit(max_articles));
        }
        self.max_articles = max_articles;
        Ok(())
    }
}

impl GeminiConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url(&self.endpoint)?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.cache_ttl_seconds > 604_800 {
            return Err(ConfigError::InvalidCacheTtl(self.cache_ttl_seconds));
        }

        Ok(())
    }

    /// `generateContent` URL for the configured model
    #[inline]
    pub fn generate_url(&self) -> Result<Url, ConfigError> {
        join_path(
            &self.endpoint,
            &format!("models/{}:generateContent", self.model),
        )
    }

    #[inline]
    pub fn set_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.model = model;
        Ok(())
    }
}
