use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// An operation exposed across the IPC boundary.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    async fn handle(&self, payload: Value) -> Result<Value, ApiError>;
}

/// Adapter turning an async closure into an [`OperationHandler`].
pub struct FnHandler<F>(F);

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> OperationHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
{
    async fn handle(&self, payload: Value) -> Result<Value, ApiError> {
        (self.0)(payload).await
    }
}

/// Decode a request payload, reporting failures against the operation name.
pub fn parse_payload<T: DeserializeOwned>(operation: &str, payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::invalid_payload(operation, e))
}

/// Encode a handler result for the response envelope.
pub fn to_result<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::EncodeFailure(e.to_string()))
}
