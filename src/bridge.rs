//! Composition root: builds collaborators from configuration and registers
//! every operation on one immutable dispatcher.

use crate::catalog::{
    DisabledCatalogFetcher, HttpCatalogFetcher, RemoteCatalogFetcher, TemplateAggregator,
    TtlResourceCache,
};
use crate::clock::SystemClock;
use crate::config::BridgeConfig;
use crate::dispatch::{IpcRequest, IpcResponse, LoggedHandlerDispatcher};
use crate::error::ApiError;
use crate::handlers::{register_all, BridgeServices, HttpBudgetClient};
use crate::settings::FileSettingsStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const LANGUAGE_MODEL_CACHE: &str = "language-models";

pub struct Bridge {
    dispatcher: LoggedHandlerDispatcher,
}

impl Bridge {
    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, ApiError> {
        let settings = match &config.settings.path {
            Some(path) => FileSettingsStore::new(path),
            None => FileSettingsStore::at_default_location()?,
        };
        info!(path = %settings.path().display(), "Using settings file");

        let model_fetcher = HttpCatalogFetcher::new(&config.catalog.url, config.catalog.timeout())?;
        let models = TtlResourceCache::new(
            LANGUAGE_MODEL_CACHE,
            Arc::new(model_fetcher),
            Arc::new(SystemClock),
            config.catalog.ttl(),
        );

        let template_source: Arc<dyn RemoteCatalogFetcher> =
            match (&config.templates.url, config.templates.remote_enabled) {
                (Some(url), true) => Arc::new(HttpCatalogFetcher::new(
                    url,
                    Duration::from_secs(config.templates.timeout_secs),
                )?),
                _ => Arc::new(DisabledCatalogFetcher),
            };

        let services = BridgeServices {
            settings: Arc::new(settings),
            models: Arc::new(models),
            templates: Arc::new(TemplateAggregator::with_builtin(template_source)),
            budget: Arc::new(HttpBudgetClient::new(&config.budget)?),
            mode: config.mode,
        };
        Self::with_services(services)
    }

    /// Register all operations against the given collaborators.
    pub fn with_services(services: BridgeServices) -> Result<Self, ApiError> {
        let mut builder = LoggedHandlerDispatcher::builder();
        register_all(&mut builder, &services)?;
        info!(mode = ?services.mode, "Bridge initialized");
        Ok(Self {
            dispatcher: builder.build(),
        })
    }

    pub fn dispatcher(&self) -> &LoggedHandlerDispatcher {
        &self.dispatcher
    }

    pub async fn dispatch(&self, request: IpcRequest) -> IpcResponse {
        self.dispatcher.dispatch(request).await
    }
}
