use crate::integration::support::Harness;
use serde_json::{json, Value};
use xibe_bridge::config::ExecutionMode;
use xibe_bridge::dispatch::{DispatcherBuilder, IpcRequest, IpcResponse};
use xibe_bridge::error::ErrorKind;
use xibe_bridge::handlers::register_all;
use xibe_bridge::Bridge;

async fn roundtrip(bridge: &Bridge, line: &str) -> Value {
    let request: IpcRequest = serde_json::from_str(line).unwrap();
    let response: IpcResponse = bridge.dispatch(request).await;
    serde_json::to_value(response).unwrap()
}

#[test]
fn every_operation_is_registered_once() {
    let harness = Harness::new();
    let bridge = Bridge::with_services(harness.services(ExecutionMode::Standard)).unwrap();
    assert_eq!(
        bridge.dispatcher().operations(),
        vec![
            "clear-user-secret",
            "get-language-models",
            "get-template",
            "get-templates",
            "get-user-budget",
            "get-user-settings",
            "refresh-language-models",
            "set-user-settings",
        ]
    );
}

#[test]
fn registering_the_operation_set_twice_fails_at_startup() {
    let harness = Harness::new();
    let services = harness.services(ExecutionMode::Standard);
    let mut builder = DispatcherBuilder::new();
    register_all(&mut builder, &services).unwrap();

    let err = register_all(&mut builder, &services).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateRegistration);
}

#[tokio::test]
async fn budget_response_carries_correlation_id_and_record() {
    let harness = Harness::new();
    let bridge = Bridge::with_services(harness.services(ExecutionMode::Standard)).unwrap();

    let out = roundtrip(&bridge, r#"{"correlationId":7,"operation":"get-user-budget"}"#).await;
    assert_eq!(out["correlationId"], 7);
    assert_eq!(out["result"]["usedCredits"], 30);
    assert_eq!(out["result"]["totalCredits"], 150);
    assert_eq!(harness.budget.calls(), 1);
}

#[tokio::test]
async fn constrained_budget_is_null_and_reaches_no_collaborator() {
    let harness = Harness::new();
    let bridge = Bridge::with_services(harness.services(ExecutionMode::Constrained)).unwrap();

    let out = roundtrip(&bridge, r#"{"correlationId":1,"operation":"get-user-budget"}"#).await;
    assert_eq!(out, json!({ "correlationId": 1, "result": null }));
    assert_eq!(harness.store.calls(), 0);
    assert_eq!(harness.budget.calls(), 0);
    assert_eq!(harness.models.calls(), 0);
}

#[tokio::test]
async fn failures_cross_the_boundary_as_kind_and_message() {
    let harness = Harness::new();
    let bridge = Bridge::with_services(harness.services(ExecutionMode::Standard)).unwrap();

    let out = roundtrip(
        &bridge,
        r#"{"correlationId":9,"operation":"get-template","payload":{"templateId":"nonexistent-id"}}"#,
    )
    .await;
    assert_eq!(out["correlationId"], 9);
    assert!(out.get("result").is_none());
    assert_eq!(out["error"]["kind"], "NotFound");
    assert!(out["error"]["message"]
        .as_str()
        .unwrap()
        .contains("nonexistent-id"));
    assert_eq!(out["error"].as_object().unwrap().len(), 2);

    let out = roundtrip(&bridge, r#"{"correlationId":10,"operation":"launch-rockets"}"#).await;
    assert_eq!(out["error"]["kind"], "UnknownOperation");
}
