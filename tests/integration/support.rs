//! Fakes shared by the integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use xibe_bridge::catalog::{RemoteCatalogFetcher, TemplateAggregator, TtlResourceCache};
use xibe_bridge::clock::ManualClock;
use xibe_bridge::config::ExecutionMode;
use xibe_bridge::error::{ApiError, FetchError};
use xibe_bridge::handlers::{BridgeServices, BudgetClient, BudgetInfo};
use xibe_bridge::settings::{
    InMemorySettingsStore, SecretField, SecretSettingsStore, SettingsPatch, SettingsRecord,
};
use xibe_bridge::types::CatalogEntry;

pub fn entries(ids: &[&str]) -> Vec<CatalogEntry> {
    ids.iter()
        .map(|id| CatalogEntry::new(*id, id.to_uppercase()))
        .collect()
}

/// Replays queued results in order; repeats the last one once the queue drains.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<Vec<CatalogEntry>, FetchError>>>,
    last: Mutex<Option<Result<Vec<CatalogEntry>, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<Vec<CatalogEntry>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCatalogFetcher for ScriptedFetcher {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(result) => {
                *self.last.lock() = Some(result.clone());
                result
            }
            None => self
                .last
                .lock()
                .clone()
                .unwrap_or_else(|| Ok(Vec::new())),
        }
    }
}

/// Blocks every fetch until permits are released.
pub struct GatedFetcher {
    gate: Semaphore,
    result: Result<Vec<CatalogEntry>, FetchError>,
    calls: AtomicUsize,
}

impl GatedFetcher {
    pub fn new(result: Result<Vec<CatalogEntry>, FetchError>) -> Self {
        Self {
            gate: Semaphore::new(0),
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self, permits: usize) {
        self.gate.add_permits(permits);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCatalogFetcher for GatedFetcher {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| FetchError::Aborted(e.to_string()))?;
        permit.forget();
        self.result.clone()
    }
}

/// Store wrapper counting every call that reaches it.
pub struct CountingStore {
    inner: InMemorySettingsStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(record: SettingsRecord) -> Self {
        Self {
            inner: InMemorySettingsStore::with_record(record),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretSettingsStore for CountingStore {
    async fn read(&self) -> Result<SettingsRecord, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.read().await
    }

    async fn update(&self, patch: SettingsPatch) -> Result<SettingsRecord, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(patch).await
    }
}

pub struct FixedBudgetClient {
    pub info: BudgetInfo,
    calls: AtomicUsize,
}

impl FixedBudgetClient {
    pub fn new(info: BudgetInfo) -> Self {
        Self {
            info,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BudgetClient for FixedBudgetClient {
    async fn fetch_budget(&self, _api_key: &SecretField) -> Result<BudgetInfo, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.clone())
    }
}

pub fn sample_budget() -> BudgetInfo {
    BudgetInfo {
        used_credits: 30,
        total_credits: 150,
        budget_reset_date: "2026-11-01T00:00:00Z".parse().unwrap(),
    }
}

pub fn keyed_record() -> SettingsRecord {
    SettingsRecord {
        xibe_api_key: Some(SecretField::new("xb-live")),
        polar_license_key: Some(SecretField::new("polar-live")),
        ..SettingsRecord::default()
    }
}

/// Collaborators wired around in-memory fakes.
pub struct Harness {
    pub store: Arc<CountingStore>,
    pub models: Arc<ScriptedFetcher>,
    pub templates: Arc<ScriptedFetcher>,
    pub budget: Arc<FixedBudgetClient>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(CountingStore::new(keyed_record())),
            models: Arc::new(ScriptedFetcher::new(vec![Ok(entries(&["gpt", "claude"]))])),
            templates: Arc::new(ScriptedFetcher::new(vec![Ok(entries(&["remote-astro"]))])),
            budget: Arc::new(FixedBudgetClient::new(sample_budget())),
            clock: Arc::new(ManualClock::new(1_000_000)),
        }
    }

    pub fn services(&self, mode: ExecutionMode) -> BridgeServices {
        BridgeServices {
            settings: self.store.clone(),
            models: Arc::new(TtlResourceCache::new(
                "language-models",
                self.models.clone(),
                self.clock.clone(),
                Duration::from_secs(300),
            )),
            templates: Arc::new(TemplateAggregator::with_builtin(self.templates.clone())),
            budget: self.budget.clone(),
            mode,
        }
    }
}
