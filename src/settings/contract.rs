use crate::error::ApiError;
use crate::settings::record::{SettingsPatch, SettingsRecord};
use async_trait::async_trait;

/// Persisted settings document holding credential slots.
///
/// `update` is a read-modify-write: the patch is merged with
/// [`SettingsRecord::apply`] and the merged record is returned. Failures are
/// reported as `ApiError::PersistenceFailure` and are not retried.
#[async_trait]
pub trait SecretSettingsStore: Send + Sync {
    async fn read(&self) -> Result<SettingsRecord, ApiError>;

    async fn update(&self, patch: SettingsPatch) -> Result<SettingsRecord, ApiError>;
}
