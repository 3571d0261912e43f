//! Configuration
//!
//! Layered bridge configuration: serde defaults, then the global config file,
//! then an explicit file, then `XIBE__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::catalog::DEFAULT_CATALOG_TTL;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Execution mode of the host process.
///
/// `Constrained` marks a test or sandboxed run in which handlers that would call
/// out to paid services short-circuit instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Standard,
    Constrained,
}

impl ExecutionMode {
    pub fn is_constrained(self) -> bool {
        self == ExecutionMode::Constrained
    }
}

fn default_catalog_url() -> String {
    "https://api.xibe.app/v1/catalog/language-models".to_string()
}

fn default_user_info_url() -> String {
    "https://gateway.xibe.app/user/info".to_string()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_CATALOG_TTL.as_secs()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Language model catalog source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            ttl_secs: default_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote template source. Off unless explicitly enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub remote_enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            remote_enabled: false,
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Budget gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_user_info_url")]
    pub user_info_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            user_info_url: default_user_info_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Settings file; `None` uses `<config dir>/user-settings.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Top-level bridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.chars().any(char::is_whitespace))
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.catalog.ttl_secs == 0 {
            return Err(ApiError::ConfigError(
                "catalog.ttl_secs must be greater than 0".to_string(),
            ));
        }
        for (key, secs) in [
            ("catalog.timeout_secs", self.catalog.timeout_secs),
            ("templates.timeout_secs", self.templates.timeout_secs),
            ("budget.timeout_secs", self.budget.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ApiError::ConfigError(format!("{} must be greater than 0", key)));
            }
        }
        if !is_http_url(&self.catalog.url) {
            return Err(ApiError::ConfigError(format!(
                "Invalid catalog.url: {}",
                self.catalog.url
            )));
        }
        if !is_http_url(&self.budget.user_info_url) {
            return Err(ApiError::ConfigError(format!(
                "Invalid budget.user_info_url: {}",
                self.budget.user_info_url
            )));
        }
        match (&self.templates.url, self.templates.remote_enabled) {
            (Some(url), _) if !is_http_url(url) => Err(ApiError::ConfigError(format!(
                "Invalid templates.url: {}",
                url
            ))),
            (None, true) => Err(ApiError::ConfigError(
                "templates.remote_enabled requires templates.url".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
