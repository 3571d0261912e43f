use crate::catalog::{TemplateAggregator, TtlResourceCache};
use crate::dispatch::{handler_fn, parse_payload, to_result, DispatcherBuilder};
use crate::error::ApiError;
use serde::Deserialize;
use std::sync::Arc;

pub const GET_LANGUAGE_MODELS: &str = "get-language-models";
pub const REFRESH_LANGUAGE_MODELS: &str = "refresh-language-models";
pub const GET_TEMPLATES: &str = "get-templates";
pub const GET_TEMPLATE: &str = "get-template";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateRequest {
    template_id: String,
}

/// Language model catalog operations, served from the TTL cache.
pub fn register_models(
    builder: &mut DispatcherBuilder,
    models: &Arc<TtlResourceCache>,
) -> Result<(), ApiError> {
    let cache = Arc::clone(models);
    builder.register(
        GET_LANGUAGE_MODELS,
        handler_fn(move |_payload| {
            let cache = Arc::clone(&cache);
            async move { to_result(cache.get().await) }
        }),
    )?;

    let cache = Arc::clone(models);
    builder.register(
        REFRESH_LANGUAGE_MODELS,
        handler_fn(move |_payload| {
            let cache = Arc::clone(&cache);
            async move {
                cache.invalidate();
                to_result(cache.get().await)
            }
        }),
    )?;

    Ok(())
}

/// Template catalog operations.
pub fn register_templates(
    builder: &mut DispatcherBuilder,
    templates: &Arc<TemplateAggregator>,
) -> Result<(), ApiError> {
    let aggregator = Arc::clone(templates);
    builder.register(
        GET_TEMPLATES,
        handler_fn(move |_payload| {
            let aggregator = Arc::clone(&aggregator);
            async move { to_result(aggregator.get_all().await) }
        }),
    )?;

    let aggregator = Arc::clone(templates);
    builder.register(
        GET_TEMPLATE,
        handler_fn(move |payload| {
            let aggregator = Arc::clone(&aggregator);
            async move {
                let request: TemplateRequest = parse_payload(GET_TEMPLATE, payload)?;
                to_result(aggregator.resolve_or_fail(&request.template_id).await?)
            }
        }),
    )?;

    Ok(())
}
