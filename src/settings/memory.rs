use crate::error::ApiError;
use crate::settings::contract::SecretSettingsStore;
use crate::settings::record::{SettingsPatch, SettingsRecord};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Settings held in process memory only.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    record: RwLock<SettingsRecord>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SettingsRecord) -> Self {
        Self {
            record: RwLock::new(record),
        }
    }
}

#[async_trait]
impl SecretSettingsStore for InMemorySettingsStore {
    async fn read(&self) -> Result<SettingsRecord, ApiError> {
        Ok(self.record.read().clone())
    }

    async fn update(&self, patch: SettingsPatch) -> Result<SettingsRecord, ApiError> {
        let mut record = self.record.write();
        record.apply(patch);
        Ok(record.clone())
    }
}
