//! Xibe Bridge: backend operations exposed to a sandboxed front-end
//!
//! Named operations (credential storage, budget state, remote catalogs) are
//! registered once on a logged dispatcher. Remote catalogs are served through a
//! TTL cache with stale-on-error fallback and a de-duplicating template
//! aggregator, so front-end triggers never fan out into redundant network calls.

pub mod auth_gate;
pub mod bridge;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod settings;
pub mod types;

pub use bridge::Bridge;
pub use error::{ApiError, ErrorKind, FetchError};
