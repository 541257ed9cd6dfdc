//! Typed client for `POST /api/plan`, for front ends and scripts talking to
//! a running planner server.

use reqwest::StatusCode;
use shared::{AppData, ErrorResponse, Plan};
use tracing::{info, warn};

use crate::domain::{normalize_plan_text, InFlight, PlanError, PlannerState, ValidationError};

#[derive(Clone)]
pub struct PlanClient {
    base_url: String,
    http: reqwest::Client,
    in_flight: InFlight,
}

impl PlanClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            in_flight: InFlight::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Ask the server for a plan covering `data`. Refuses to start while a
    /// previous request from this client is still running.
    pub async fn request_plan(&self, data: &AppData) -> Result<Plan, PlanError> {
        if data.items.is_empty() {
            return Err(ValidationError::NoItems.into());
        }
        let _guard = self.in_flight.try_begin().ok_or(PlanError::InFlight)?;

        let request = PlannerState::new(data.clone()).plan_request();

        let url = format!("{}/api/plan", self.base_url);
        info!("Requesting plan for {} items from {}", request.items.len(), url);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlanError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlanError::Network(e.to_string()))?;

        if status == StatusCode::CONFLICT {
            return Err(PlanError::InFlight);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| "Server error".to_string());
            warn!("Plan request failed with {}: {}", status, message);
            return Err(PlanError::Network(message));
        }

        Ok(normalize_plan_text(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use shared::{ExpenseEntry, FinanceProfile, Item, Priority};

    async fn serve(reply: &str) -> String {
        let (app, _) = test_app(reply);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn data_with_item() -> AppData {
        AppData {
            finance: FinanceProfile {
                income: 30000.0,
                expense_history: vec![ExpenseEntry {
                    id: "e1".to_string(),
                    label: "Aug".to_string(),
                    amount: 20000.0,
                }],
            },
            items: vec![Item {
                id: "i1".to_string(),
                name: "Headphones".to_string(),
                price: 7000.0,
                link: String::new(),
                priority: Priority::High,
            }],
        }
    }

    #[tokio::test]
    async fn test_request_plan_round_trip() {
        let base_url = serve("{\"summary\":\"Wait one month\",\"months\":[{\"monthOffset\":1}]}").await;
        let client = PlanClient::new(format!("{}/", base_url));

        let plan = client.request_plan(&data_with_item()).await.unwrap();
        assert_eq!(plan.summary.as_deref(), Some("Wait one month"));
        assert_eq!(plan.months[0].month_offset, Some(1));
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_no_items_is_rejected_locally() {
        let client = PlanClient::new("http://127.0.0.1:9");
        let data = AppData::default();

        let err = client.request_plan(&data).await.unwrap_err();
        assert!(matches!(err, PlanError::Validation(ValidationError::NoItems)));
        assert_eq!(err.to_string(), "Add at least one dream item before asking AI.");
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let base_url = serve("not json").await;
        let client = PlanClient::new(base_url);

        match client.request_plan(&data_with_item()).await {
            Err(PlanError::Network(message)) => assert_eq!(message, "Failed to generate plan"),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_busy_client_refuses_second_request() {
        let client = PlanClient::new("http://127.0.0.1:9");
        let _guard = client.in_flight.try_begin().unwrap();

        let err = client.request_plan(&data_with_item()).await.unwrap_err();
        assert!(matches!(err, PlanError::InFlight));
    }
}
