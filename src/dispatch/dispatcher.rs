//! Handler registration and logged dispatch.
//!
//! Registration happens on a [`DispatcherBuilder`] during startup. A name may be
//! registered once; a second registration is a startup error. Once built, the
//! [`LoggedHandlerDispatcher`] is immutable and serves requests for the rest of
//! the process lifetime.

use crate::dispatch::envelope::{ErrorPayload, IpcRequest, IpcResponse};
use crate::dispatch::handler::OperationHandler;
use crate::error::ApiError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};

#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<String, Arc<dyn OperationHandler>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> Result<&mut Self, ApiError>
    where
        H: OperationHandler + 'static,
    {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register an already shared handler under `name`.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn OperationHandler>,
    ) -> Result<&mut Self, ApiError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(ApiError::DuplicateRegistration(name));
        }
        debug!(operation = %name, "Registered IPC handler");
        self.handlers.insert(name, handler);
        Ok(self)
    }

    pub fn build(self) -> LoggedHandlerDispatcher {
        info!(operations = self.handlers.len(), "IPC dispatcher ready");
        LoggedHandlerDispatcher {
            handlers: self.handlers,
        }
    }
}

pub struct LoggedHandlerDispatcher {
    handlers: HashMap<String, Arc<dyn OperationHandler>>,
}

impl LoggedHandlerDispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    /// Handle one transport request. Never fails: handler errors come back as
    /// an error outcome carrying only kind and message.
    pub async fn dispatch(&self, request: IpcRequest) -> IpcResponse {
        let IpcRequest {
            correlation_id,
            operation,
            payload,
        } = request;
        let span = info_span!("ipc", operation = %operation, correlation_id);
        match self.invoke(&operation, payload).instrument(span).await {
            Ok(result) => IpcResponse::ok(correlation_id, result),
            Err(error) => IpcResponse::err(correlation_id, error),
        }
    }

    /// Invoke a named operation directly, without a transport envelope.
    pub async fn invoke(&self, operation: &str, payload: Value) -> Result<Value, ErrorPayload> {
        let Some(handler) = self.handlers.get(operation) else {
            let err = ApiError::UnknownOperation(operation.to_string());
            error!(kind = %err.kind(), error = %err, "IPC request for unregistered operation");
            return Err(ErrorPayload::from(&err));
        };

        debug!("Handling IPC request");
        let started = Instant::now();
        match handler.handle(payload).await {
            Ok(result) => {
                info!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    "IPC request completed"
                );
                Ok(result)
            }
            Err(err) => {
                error!(
                    kind = %err.kind(),
                    error = %err,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "IPC request failed"
                );
                Err(ErrorPayload::from(&err))
            }
        }
    }
}
