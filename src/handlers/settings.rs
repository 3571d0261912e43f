//! Settings operations. Secret values pass through these handlers but never
//! reach the log.

use crate::dispatch::{handler_fn, parse_payload, to_result, DispatcherBuilder};
use crate::error::ApiError;
use crate::settings::{SecretSettingsStore, SecretSlot, SettingsPatch};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub const GET_USER_SETTINGS: &str = "get-user-settings";
pub const SET_USER_SETTINGS: &str = "set-user-settings";
pub const CLEAR_USER_SECRET: &str = "clear-user-secret";

#[derive(Debug, Deserialize)]
struct ClearSecretRequest {
    field: SecretSlot,
}

pub fn register(
    builder: &mut DispatcherBuilder,
    store: &Arc<dyn SecretSettingsStore>,
) -> Result<(), ApiError> {
    let read_store = Arc::clone(store);
    builder.register(
        GET_USER_SETTINGS,
        handler_fn(move |_payload| {
            let store = Arc::clone(&read_store);
            async move { to_result(store.read().await?) }
        }),
    )?;

    let update_store = Arc::clone(store);
    builder.register(
        SET_USER_SETTINGS,
        handler_fn(move |payload| {
            let store = Arc::clone(&update_store);
            async move {
                let patch: SettingsPatch = parse_payload(SET_USER_SETTINGS, payload)?;
                to_result(store.update(patch).await?)
            }
        }),
    )?;

    let clear_store = Arc::clone(store);
    builder.register(
        CLEAR_USER_SECRET,
        handler_fn(move |payload| {
            let store = Arc::clone(&clear_store);
            async move {
                let request: ClearSecretRequest = parse_payload(CLEAR_USER_SECRET, payload)?;
                let record = store.update(SettingsPatch::clearing(request.field)).await?;
                info!(field = ?request.field, "Cleared stored credential");
                to_result(record)
            }
        }),
    )?;

    Ok(())
}
