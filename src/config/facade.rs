//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::BridgeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(explicit: Option<&Path>) -> Result<BridgeConfig, ApiError> {
        MergeService::load(explicit)
    }

    /// Load configuration from a specific file only.
    pub fn load_from_file(path: &Path) -> Result<BridgeConfig, ApiError> {
        MergeService::load_file_only(path)
    }

    /// Create default configuration.
    pub fn default() -> BridgeConfig {
        BridgeConfig::default()
    }
}
