use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use xibe_bridge::dispatch::DispatcherBuilder;
use xibe_bridge::handlers::settings::{
    register, CLEAR_USER_SECRET, GET_USER_SETTINGS, SET_USER_SETTINGS,
};
use xibe_bridge::settings::{FileSettingsStore, SecretSettingsStore, SecretSlot};

fn dispatcher_at(path: &std::path::Path) -> xibe_bridge::dispatch::LoggedHandlerDispatcher {
    let store: Arc<dyn SecretSettingsStore> = Arc::new(FileSettingsStore::new(path));
    let mut builder = DispatcherBuilder::new();
    register(&mut builder, &store).unwrap();
    builder.build()
}

#[tokio::test]
async fn removing_one_secret_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user-settings.json");

    let dispatcher = dispatcher_at(&path);
    dispatcher
        .invoke(
            SET_USER_SETTINGS,
            json!({
                "xibeApiKey": { "value": "xb-live" },
                "polarLicenseKey": { "value": "polar-live" },
                "theme": "dark"
            }),
        )
        .await
        .unwrap();
    dispatcher
        .invoke(CLEAR_USER_SECRET, json!({ "field": "xibeApiKey" }))
        .await
        .unwrap();
    drop(dispatcher);

    let reopened = FileSettingsStore::new(&path);
    let record = reopened.read().await.unwrap();
    assert!(record.secret(SecretSlot::XibeApiKey).is_none());
    assert_eq!(
        record.secret(SecretSlot::PolarLicenseKey).map(|s| s.expose()),
        Some("polar-live")
    );
    assert_eq!(record.extra.get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn fresh_install_reads_empty_settings() {
    let dir = TempDir::new().unwrap();
    let dispatcher = dispatcher_at(&dir.path().join("nested").join("user-settings.json"));
    let out = dispatcher.invoke(GET_USER_SETTINGS, Value::Null).await.unwrap();
    assert_eq!(out, json!({}));
}

#[tokio::test]
async fn corrupt_settings_file_is_a_persistence_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("user-settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let dispatcher = dispatcher_at(&path);
    let err = dispatcher
        .invoke(SET_USER_SETTINGS, json!({ "theme": "light" }))
        .await
        .unwrap_err();
    assert_eq!(err.kind, "PersistenceFailure");
}
