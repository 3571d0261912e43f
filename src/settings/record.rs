use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A configured credential. Replaced whole, never edited in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretField {
    value: String,
}

impl SecretField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for SecretField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretField(<redacted>)")
    }
}

/// Named credential slots in the settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretSlot {
    XibeApiKey,
    PolarLicenseKey,
}

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xibe_api_key: Option<SecretField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polar_license_key: Option<SecretField>,
    /// Every other setting, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsRecord {
    pub fn secret(&self, slot: SecretSlot) -> Option<&SecretField> {
        match slot {
            SecretSlot::XibeApiKey => self.xibe_api_key.as_ref(),
            SecretSlot::PolarLicenseKey => self.polar_license_key.as_ref(),
        }
    }

    /// Shallow merge: keys present in the patch replace (or with `null`, remove)
    /// the stored value; keys absent from the patch are left alone.
    pub fn apply(&mut self, patch: SettingsPatch) {
        patch.xibe_api_key.apply_to(&mut self.xibe_api_key);
        patch.polar_license_key.apply_to(&mut self.polar_license_key);
        for (key, value) in patch.extra {
            if value.is_null() {
                self.extra.remove(&key);
            } else {
                self.extra.insert(key, value);
            }
        }
    }
}

/// Change to a single field: omitted, explicitly cleared, or replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => *slot = None,
            FieldUpdate::Set(value) => *slot = Some(value),
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

// Only invoked for keys present in the input; absent keys fall back to `Keep`.
fn deserialize_update<'de, D, T>(deserializer: D) -> Result<FieldUpdate<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(FieldUpdate::from)
}

/// Partial settings as sent by the front-end. `null` clears a key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, deserialize_with = "deserialize_update")]
    pub xibe_api_key: FieldUpdate<SecretField>,
    #[serde(default, deserialize_with = "deserialize_update")]
    pub polar_license_key: FieldUpdate<SecretField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingsPatch {
    /// Patch that clears exactly one credential.
    pub fn clearing(slot: SecretSlot) -> Self {
        let mut patch = Self::default();
        match slot {
            SecretSlot::XibeApiKey => patch.xibe_api_key = FieldUpdate::Clear,
            SecretSlot::PolarLicenseKey => patch.polar_license_key = FieldUpdate::Clear,
        }
        patch
    }

    /// Patch that sets exactly one credential.
    pub fn setting(slot: SecretSlot, secret: SecretField) -> Self {
        let mut patch = Self::default();
        match slot {
            SecretSlot::XibeApiKey => patch.xibe_api_key = FieldUpdate::Set(secret),
            SecretSlot::PolarLicenseKey => patch.polar_license_key = FieldUpdate::Set(secret),
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn record_with_both() -> SettingsRecord {
        SettingsRecord {
            xibe_api_key: Some(SecretField::new("xb-123")),
            polar_license_key: Some(SecretField::new("polar-456")),
            extra: Map::new(),
        }
    }

    #[test]
    fn null_clears_and_absent_preserves() {
        let mut record = record_with_both();
        let patch: SettingsPatch = serde_json::from_value(json!({ "xibeApiKey": null })).unwrap();
        record.apply(patch);

        assert!(record.xibe_api_key.is_none());
        assert_eq!(record.polar_license_key, Some(SecretField::new("polar-456")));
    }

    #[test]
    fn present_value_replaces_whole_field() {
        let mut record = record_with_both();
        let patch: SettingsPatch =
            serde_json::from_value(json!({ "polarLicenseKey": { "value": "polar-new" } })).unwrap();
        record.apply(patch);

        assert_eq!(record.polar_license_key, Some(SecretField::new("polar-new")));
        assert_eq!(record.xibe_api_key, Some(SecretField::new("xb-123")));
    }

    #[test]
    fn empty_patch_is_all_keep() {
        let patch: SettingsPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.xibe_api_key.is_keep());
        assert!(patch.polar_license_key.is_keep());
        assert!(patch.extra.is_empty());
    }

    #[test]
    fn other_settings_merge_shallowly() {
        let mut record: SettingsRecord = serde_json::from_value(json!({
            "theme": "dark",
            "telemetry": { "enabled": true },
            "autoApprove": false
        }))
        .unwrap();
        let patch: SettingsPatch = serde_json::from_value(json!({
            "telemetry": { "userId": "u1" },
            "autoApprove": null
        }))
        .unwrap();
        record.apply(patch);

        assert_eq!(record.extra.get("theme"), Some(&json!("dark")));
        assert_eq!(record.extra.get("telemetry"), Some(&json!({ "userId": "u1" })));
        assert!(!record.extra.contains_key("autoApprove"));
    }

    #[test]
    fn clearing_helper_targets_one_slot() {
        let mut record = record_with_both();
        record.apply(SettingsPatch::clearing(SecretSlot::PolarLicenseKey));
        assert!(record.secret(SecretSlot::PolarLicenseKey).is_none());
        assert!(record.secret(SecretSlot::XibeApiKey).is_some());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let record = record_with_both();
        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("xb-123"));
        assert!(!rendered.contains("polar-456"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn unset_secrets_are_omitted_from_json() {
        let json = serde_json::to_value(SettingsRecord::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    fn update_strategy() -> impl Strategy<Value = FieldUpdate<SecretField>> {
        prop_oneof![
            Just(FieldUpdate::Keep),
            Just(FieldUpdate::Clear),
            "[a-z0-9]{1,12}".prop_map(|v| FieldUpdate::Set(SecretField::new(v))),
        ]
    }

    fn slot_strategy() -> impl Strategy<Value = Option<SecretField>> {
        proptest::option::of("[a-z0-9]{1,12}".prop_map(SecretField::new))
    }

    proptest! {
        #[test]
        fn each_slot_follows_its_own_update(
            api in slot_strategy(),
            license in slot_strategy(),
            api_update in update_strategy(),
            license_update in update_strategy(),
        ) {
            let mut record = SettingsRecord {
                xibe_api_key: api.clone(),
                polar_license_key: license.clone(),
                extra: Map::new(),
            };
            let expected = |original: Option<SecretField>, update: &FieldUpdate<SecretField>| {
                match update {
                    FieldUpdate::Keep => original,
                    FieldUpdate::Clear => None,
                    FieldUpdate::Set(v) => Some(v.clone()),
                }
            };
            let expected_api = expected(api, &api_update);
            let expected_license = expected(license, &license_update);

            record.apply(SettingsPatch {
                xibe_api_key: api_update,
                polar_license_key: license_update,
                extra: Map::new(),
            });

            prop_assert_eq!(record.xibe_api_key, expected_api);
            prop_assert_eq!(record.polar_license_key, expected_license);
        }
    }
}
