//! Plan generation: prompt the provider with the current snapshot and turn
//! its reply into a [`Plan`].

use async_trait::async_trait;
use shared::{Plan, PlanRequest};
use std::sync::Arc;
use tracing::{error, info};

use super::errors::PlanError;
use super::in_flight::InFlight;
use super::plan_normalizer::normalize_plan_text;
use super::plan_prompt::{build_user_prompt, SYSTEM_PROMPT};

/// Anything that can answer a system + user prompt with free text
#[async_trait]
pub trait PlanProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct PlanService {
    provider: Arc<dyn PlanProvider>,
    in_flight: InFlight,
}

impl PlanService {
    pub fn new(provider: Arc<dyn PlanProvider>) -> Self {
        Self {
            provider,
            in_flight: InFlight::new(),
        }
    }

    /// Ask the provider for a plan. Only one request runs at a time; a second
    /// one is refused with [`PlanError::InFlight`] instead of being queued.
    pub async fn generate_plan(&self, request: PlanRequest) -> Result<Plan, PlanError> {
        let _guard = self.in_flight.try_begin().ok_or(PlanError::InFlight)?;

        info!(
            "Generating plan for {} items, monthly savings {:.0}",
            request.items.len(),
            request.finance.monthly_savings
        );

        let user_prompt =
            build_user_prompt(&request).map_err(|e| PlanError::Provider(format!("{:#}", e)))?;

        let content = self
            .provider
            .complete(SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                error!("Plan provider call failed: {:#}", e);
                PlanError::Provider(format!("{:#}", e))
            })?;

        let plan = normalize_plan_text(&content).map_err(|e| {
            error!("Plan provider returned unparseable text: {}", e);
            PlanError::from(e)
        })?;

        info!("Plan generated with {} months", plan.months.len());
        Ok(plan)
    }
}
