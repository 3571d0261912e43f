//! IPC dispatch: named operations registered once at startup, each invocation
//! wrapped in structured logging and uniform error translation.

pub mod dispatcher;
pub mod envelope;
pub mod handler;

pub use dispatcher::{DispatcherBuilder, LoggedHandlerDispatcher};
pub use envelope::{ErrorPayload, IpcRequest, IpcResponse, Outcome, RejectedLine};
pub use handler::{handler_fn, parse_payload, to_result, FnHandler, OperationHandler};
