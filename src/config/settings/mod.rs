
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GSC_CLIENT_ID_VAR: &str = "GSC_CLIENT_ID";
pub const GSC_CLIENT_SECRET_VAR: &str = "GSC_CLIENT_SECRET";
pub const GSC_REFRESH_TOKEN_VAR: &str = "GSC_REFRESH_TOKEN";

pub(crate) const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub search_console: SearchConsoleConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpenAiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub response_language: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
            response_language: "European Portuguese (PT-PT)".to_string(),
        }
    }
}

/// Page retrieval policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Treat a non-success HTTP status as a fetch failure. When disabled the
    /// body of the error page is parsed as if it were content.
    pub fail_on_error_status: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            fail_on_error_status: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConsoleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub row_limit: u32,
    pub token_url: String,
    pub api_base_url: String,
}

impl Default for SearchConsoleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            row_limit: 100,
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_base_url: "https://www.googleapis.com/webmasters/v3/".to_string(),
        }
    }
}

/// Complete set of OAuth client credentials needed to query Search Console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Missing OpenAI API key (set OPENAI_API_KEY or run `seo-advisor config`)")]
    MissingApiKey,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid request timeout: {0} (must be between 1 and 600 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid row limit: {0} (must be between 1 and 25000)")]
    InvalidRowLimit(u32),
    #[error("Invalid response language: {0} (cannot be empty)")]
    InvalidLanguage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default configuration directory (`~/.seo-advisor`)
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".seo-advisor"))
            .or({
                #[cfg(windows)]
                {
                    dirs::data_dir().map(|data| data.join("seo-advisor"))
                }
                #[cfg(not(windows))]
                {
                    None
                }
            })
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load the configuration from the default directory and apply
    /// secrets found in the process environment.
    #[inline]
    pub fn load() -> Result<Self> {
        let config_dir = Self::config_dir().context("Failed to locate config directory")?;
        let mut config = Self::load_from(config_dir)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load the configuration file from `config_dir` without looking at the environment
    #[inline]
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
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

    /// Override secrets with values returned by `lookup`, typically the
    /// process environment. Empty values are ignored.
    #[inline]
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(OPENAI_API_KEY_VAR) {
            self.openai.api_key = Some(key);
        }
        if let Some(id) = non_empty(GSC_CLIENT_ID_VAR) {
            self.search_console.client_id = Some(id);
        }
        if let Some(secret) = non_empty(GSC_CLIENT_SECRET_VAR) {
            self.search_console.client_secret = Some(secret);
        }
        if let Some(token) = non_empty(GSC_REFRESH_TOKEN_VAR) {
            self.search_console.refresh_token = Some(token);
        }
    }

    /// Get the base directory for the application
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
        self.openai.validate()?;
        self.search_console.validate()?;
        Ok(())
    }

    /// The completion API key, which every analysis requires
    #[inline]
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.openai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

impl OpenAiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|_| ConfigError::InvalidUrl(self.base_url.clone()))?;

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if !(1..=600).contains(&self.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }

        if self.response_language.trim().is_empty() {
            return Err(ConfigError::InvalidLanguage(self.response_language.clone()));
        }

        Ok(())
    }

    pub fn set_base_url(&mut self, base_url: String) -> Result<(), ConfigError> {
        Url::parse(&base_url).map_err(|_| ConfigError::InvalidUrl(base_url.clone()))?;
        self.base_url = base_url;
        Ok(())
    }

    pub fn set_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.model = model;
        Ok(())
    }

    pub fn set_timeout_seconds(&mut self, timeout_seconds: u64) -> Result<(), ConfigError> {
        if !(1..=600).contains(&timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(timeout_seconds));
        }
        self.timeout_seconds = timeout_seconds;
        Ok(())
    }

    pub fn set_response_language(&mut self, language: String) -> Result<(), ConfigError> {
        if language.trim().is_empty() {
            return Err(ConfigError::InvalidLanguage(language));
        }
        self.response_language = language;
        Ok(())
    }
}

impl SearchConsoleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.token_url).map_err(|_| ConfigError::InvalidUrl(self.token_url.clone()))?;
        Url::parse(&self.api_base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api_base_url.clone()))?;

        if !(1..=25_000).contains(&self.row_limit) {
            return Err(ConfigError::InvalidRowLimit(self.row_limit));
        }

        Ok(())
    }

    pub fn set_row_limit(&mut self, row_limit: u32) -> Result<(), ConfigError> {
        if !(1..=25_000).contains(&row_limit) {
            return Err(ConfigError::InvalidRowLimit(row_limit));
        }
        self.row_limit = row_limit;
        Ok(())
    }

    /// Returns the OAuth credentials when all three are configured.
    ///
    /// A partial set disables analytics with a warning instead of failing.
    pub fn credentials(&self) -> Option<OAuthCredentials> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        match (
            present(&self.client_id),
            present(&self.client_secret),
            present(&self.refresh_token),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Some(OAuthCredentials {
                client_id,
                client_secret,
                refresh_token,
            }),
            (None, None, None) => None,
            _ => {
                warn!(
                    "Search Console credentials are incomplete; client id, client secret and refresh token are all required"
                );
                None
            }
        }
    }
}
