use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request as framed by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcRequest {
    pub correlation_id: u64,
    pub operation: String,
    #[serde(default)]
    pub payload: Value,
}

impl IpcRequest {
    pub fn new(correlation_id: u64, operation: impl Into<String>, payload: Value) -> Self {
        Self {
            correlation_id,
            operation: operation.into(),
            payload,
        }
    }
}

/// A transport line that could not be decoded into an [`IpcRequest`].
#[derive(Debug)]
pub struct RejectedLine {
    /// Error response for the caller, when the line still named a correlation id.
    pub reply: Option<IpcResponse>,
    pub reason: String,
}

impl IpcRequest {
    /// Decode one transport line.
    ///
    /// A JSON object with a numeric `correlationId` but an otherwise invalid
    /// shape is answered with an `InvalidPayload` error so the caller is not
    /// left waiting.
    pub fn decode_line(line: &str) -> Result<IpcRequest, RejectedLine> {
        let value: Value = serde_json::from_str(line).map_err(|e| RejectedLine {
            reply: None,
            reason: e.to_string(),
        })?;
        let correlation_id = value.get("correlationId").and_then(Value::as_u64);
        let operation = value
            .get("operation")
            .and_then(Value::as_str)
            .unwrap_or("request")
            .to_string();

        serde_json::from_value(value).map_err(|e| {
            let err = ApiError::invalid_payload(&operation, e);
            RejectedLine {
                reply: correlation_id.map(|id| IpcResponse::err(id, ErrorPayload::from(&err))),
                reason: err.to_string(),
            }
        })
    }
}

/// Error as seen by the front-end. Only kind and message cross the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

impl From<&ApiError> for ErrorPayload {
    fn from(err: &ApiError) -> Self {
        Self {
            kind: err.kind().as_str().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorPayload),
}

/// Response as handed back to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcResponse {
    pub correlation_id: u64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl IpcResponse {
    pub fn ok(correlation_id: u64, result: Value) -> Self {
        Self {
            correlation_id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn err(correlation_id: u64, error: ErrorPayload) -> Self {
        Self {
            correlation_id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Result(_) => None,
        }
    }
}
