//! JSON-file settings store.
//!
//! The document lives at a single path. Writes land in a sibling temp file that
//! is renamed over the original, so readers never see a half-written record.
//! Updates hold an async lock across the whole read-modify-write.

use crate::error::ApiError;
use crate::settings::contract::SecretSettingsStore;
use crate::settings::record::{SettingsPatch, SettingsRecord};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "user-settings.json";

pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the platform default location.
    pub fn at_default_location() -> Result<Self, ApiError> {
        let path = crate::config::paths::config_dir()?.join(SETTINGS_FILE_NAME);
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SettingsRecord, ApiError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file yet, using empty record");
                return Ok(SettingsRecord::default());
            }
            Err(e) => {
                return Err(ApiError::PersistenceFailure(format!(
                    "Failed to read settings {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(SettingsRecord::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            ApiError::PersistenceFailure(format!(
                "Failed to parse settings {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn persist(&self, record: &SettingsRecord) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ApiError::PersistenceFailure(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            ApiError::PersistenceFailure(format!("Failed to serialize settings: {}", e))
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            ApiError::PersistenceFailure(format!(
                "Failed to write settings to {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            ApiError::PersistenceFailure(format!(
                "Failed to replace settings {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SecretSettingsStore for FileSettingsStore {
    async fn read(&self) -> Result<SettingsRecord, ApiError> {
        self.load().await
    }

    async fn update(&self, patch: SettingsPatch) -> Result<SettingsRecord, ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load().await?;
        record.apply(patch);
        self.persist(&record).await?;
        info!(path = %self.path.display(), "Settings updated");
        Ok(record)
    }
}
