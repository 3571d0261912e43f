//! `get-user-budget`: credit balance from the usage gateway.

use crate::config::{BudgetConfig, ExecutionMode};
use crate::dispatch::{to_result, OperationHandler};
use crate::error::{ApiError, FetchError};
use crate::settings::{SecretField, SecretSettingsStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const GET_USER_BUDGET: &str = "get-user-budget";

/// Credits granted per dollar of gateway budget.
pub const CREDITS_PER_DOLLAR: f64 = 15.0;

/// `totalCredits` value for accounts without a budget ceiling.
pub const UNLIMITED_CREDITS: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInfo {
    pub used_credits: u64,
    pub total_credits: i64,
    pub budget_reset_date: DateTime<Utc>,
}

/// Gateway response body.
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    user_info: GatewayUserInfo,
}

#[derive(Debug, Deserialize)]
struct GatewayUserInfo {
    #[serde(default)]
    spend: f64,
    #[serde(default)]
    max_budget: Option<f64>,
    budget_reset_at: DateTime<Utc>,
}

impl From<GatewayUserInfo> for BudgetInfo {
    fn from(info: GatewayUserInfo) -> Self {
        let used = (info.spend * CREDITS_PER_DOLLAR).round().max(0.0) as u64;
        let total = info
            .max_budget
            .map(|dollars| (dollars * CREDITS_PER_DOLLAR).round() as i64)
            .unwrap_or(UNLIMITED_CREDITS);
        BudgetInfo {
            used_credits: used,
            total_credits: total,
            budget_reset_date: info.budget_reset_at,
        }
    }
}

/// Usage gateway port.
#[async_trait]
pub trait BudgetClient: Send + Sync {
    async fn fetch_budget(&self, api_key: &SecretField) -> Result<BudgetInfo, FetchError>;
}

pub struct HttpBudgetClient {
    client: reqwest::Client,
    user_info_url: String,
}

impl HttpBudgetClient {
    pub fn new(config: &BudgetConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            user_info_url: config.user_info_url.clone(),
        })
    }
}

#[async_trait]
impl BudgetClient for HttpBudgetClient {
    async fn fetch_budget(&self, api_key: &SecretField) -> Result<BudgetInfo, FetchError> {
        let response = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(api_key.expose())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.user_info_url.clone(),
            });
        }
        let body: GatewayResponse = response.json().await?;
        Ok(body.user_info.into())
    }
}

pub struct BudgetHandler {
    mode: ExecutionMode,
    settings: Arc<dyn SecretSettingsStore>,
    client: Arc<dyn BudgetClient>,
}

impl BudgetHandler {
    pub fn new(
        mode: ExecutionMode,
        settings: Arc<dyn SecretSettingsStore>,
        client: Arc<dyn BudgetClient>,
    ) -> Self {
        Self {
            mode,
            settings,
            client,
        }
    }
}

#[async_trait]
impl OperationHandler for BudgetHandler {
    async fn handle(&self, _payload: Value) -> Result<Value, ApiError> {
        if self.mode.is_constrained() {
            debug!("Constrained execution, skipping budget lookup");
            return Ok(Value::Null);
        }

        let record = self.settings.read().await?;
        let Some(api_key) = record.xibe_api_key else {
            warn!("No API key configured, budget unavailable");
            return Ok(Value::Null);
        };

        let info = self.client.fetch_budget(&api_key).await?;
        to_result(info)
    }
}
