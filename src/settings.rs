//! User settings holding credential slots (API key, license key).
//!
//! Persistence is behind the [`SecretSettingsStore`] port; every store applies
//! updates with the same shallow-merge rule from [`SettingsRecord::apply`].

pub mod contract;
pub mod file;
pub mod memory;
pub mod record;

pub use contract::SecretSettingsStore;
pub use file::FileSettingsStore;
pub use memory::InMemorySettingsStore;
pub use record::{FieldUpdate, SecretField, SecretSlot, SettingsPatch, SettingsRecord};
