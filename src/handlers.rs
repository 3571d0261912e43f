//! Operations exposed to the front-end.
//!
//! Each submodule owns its operation names and registers them on a
//! [`DispatcherBuilder`]. Collaborators are injected through [`BridgeServices`].

pub mod budget;
pub mod catalog;
pub mod settings;

pub use budget::{BudgetClient, BudgetHandler, BudgetInfo, HttpBudgetClient};

use crate::catalog::{TemplateAggregator, TtlResourceCache};
use crate::config::ExecutionMode;
use crate::dispatch::DispatcherBuilder;
use crate::error::ApiError;
use crate::settings::SecretSettingsStore;
use std::sync::Arc;

/// Collaborators shared by the handlers.
#[derive(Clone)]
pub struct BridgeServices {
    pub settings: Arc<dyn SecretSettingsStore>,
    pub models: Arc<TtlResourceCache>,
    pub templates: Arc<TemplateAggregator>,
    pub budget: Arc<dyn BudgetClient>,
    pub mode: ExecutionMode,
}

/// Register every exposed operation. Fails on the first duplicate name.
pub fn register_all(
    builder: &mut DispatcherBuilder,
    services: &BridgeServices,
) -> Result<(), ApiError> {
    builder.register(
        budget::GET_USER_BUDGET,
        BudgetHandler::new(
            services.mode,
            Arc::clone(&services.settings),
            Arc::clone(&services.budget),
        ),
    )?;
    settings::register(builder, &services.settings)?;
    catalog::register_models(builder, &services.models)?;
    catalog::register_templates(builder, &services.templates)?;
    Ok(())
}
