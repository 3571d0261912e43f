//! Project template catalog.
//!
//! The offerable catalog is the built-in templates followed by whatever the
//! remote template source returns. Concurrent requests for the remote half share
//! a single in-flight fetch, and a failing remote source contributes nothing.

use crate::catalog::fetcher::RemoteCatalogFetcher;
use crate::error::{ApiError, FetchError};
use crate::types::CatalogEntry;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Templates shipped with the app, in display order.
pub fn builtin_templates() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("react", "React.js Template")
            .with_description("Uses React.js, Vite, Shadcn, Tailwind and TypeScript."),
        CatalogEntry::new("next", "Next.js Template")
            .with_description("Uses Next.js, React.js, Shadcn, Tailwind and TypeScript."),
        CatalogEntry::new("vite-vanilla", "Vanilla Vite Template")
            .with_description("Plain TypeScript on Vite with no UI framework."),
    ]
}

type PendingFetch = Shared<BoxFuture<'static, Vec<CatalogEntry>>>;

struct InFlight {
    id: u64,
    pending: PendingFetch,
}

/// Clears the in-flight marker when dropped, if it still names this fetch.
struct ReleaseInFlight {
    slot: Arc<Mutex<Option<InFlight>>>,
    id: u64,
}

impl Drop for ReleaseInFlight {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.as_ref().map(|f| f.id) == Some(self.id) {
            *slot = None;
        }
    }
}

pub struct TemplateAggregator {
    local: Vec<CatalogEntry>,
    remote: Arc<dyn RemoteCatalogFetcher>,
    in_flight: Arc<Mutex<Option<InFlight>>>,
    next_fetch_id: AtomicU64,
}

impl TemplateAggregator {
    pub fn new(local: Vec<CatalogEntry>, remote: Arc<dyn RemoteCatalogFetcher>) -> Self {
        Self {
            local,
            remote,
            in_flight: Arc::new(Mutex::new(None)),
            next_fetch_id: AtomicU64::new(1),
        }
    }

    /// Built-in templates plus the given remote source.
    pub fn with_builtin(remote: Arc<dyn RemoteCatalogFetcher>) -> Self {
        Self::new(builtin_templates(), remote)
    }

    pub fn local(&self) -> &[CatalogEntry] {
        &self.local
    }

    /// Remote templates. Joins an in-flight fetch if there is one; a failed
    /// fetch resolves to an empty list.
    ///
    /// Must be called from within a tokio runtime. The fetch runs as its own
    /// task and completes even if every caller stops waiting.
    pub async fn fetch_dynamic(&self) -> Vec<CatalogEntry> {
        let pending = {
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(in_flight) => {
                    debug!(fetch_id = in_flight.id, "Joining in-flight template fetch");
                    in_flight.pending.clone()
                }
                None => {
                    let in_flight = self.start_fetch();
                    let pending = in_flight.pending.clone();
                    *slot = Some(in_flight);
                    pending
                }
            }
        };
        pending.await
    }

    /// Full catalog: built-in entries first, then remote entries, each in
    /// source order.
    pub async fn get_all(&self) -> Vec<CatalogEntry> {
        let mut all = self.local.clone();
        all.extend(self.fetch_dynamic().await);
        all
    }

    /// Exact-match lookup across the full catalog. Built-in entries shadow
    /// remote entries with the same id.
    pub async fn resolve_or_fail(&self, id: &str) -> Result<CatalogEntry, ApiError> {
        self.get_all()
            .await
            .into_iter()
            .find(|template| template.id == id)
            .ok_or_else(|| ApiError::not_found("Template", id))
    }

    fn start_fetch(&self) -> InFlight {
        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let remote = Arc::clone(&self.remote);
        let slot = Arc::clone(&self.in_flight);

        // Moved into the task so the marker is cleared on success, failure,
        // panic, or the task being dropped unpolled.
        let release = ReleaseInFlight { slot, id };
        let task = tokio::spawn(async move {
            let _release = release;
            remote.fetch_catalog().await
        });

        let pending = async move {
            let result = match task.await {
                Ok(result) => result,
                Err(join_err) => Err(FetchError::Aborted(join_err.to_string())),
            };
            match result {
                Ok(entries) => {
                    debug!(fetch_id = id, entries = entries.len(), "Template fetch settled");
                    entries
                }
                Err(err) => {
                    warn!(fetch_id = id, error = %err, "Remote template fetch failed, using none");
                    Vec::new()
                }
            }
        }
        .boxed()
        .shared();

        debug!(fetch_id = id, "Started remote template fetch");
        InFlight { id, pending }
    }
}
