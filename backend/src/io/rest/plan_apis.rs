//! # REST API for AI Plans
//!
//! `POST /api/plan` relays a finance snapshot and the wishlist to the plan
//! provider and returns the normalized plan. `GET /api/snapshot` returns the
//! body a client would send for the current saved state.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{ErrorResponse, FinanceSnapshot, Item, PlanRequest};
use tracing::{error, info, warn};

use super::error_response;
use crate::domain::{render_plan_text, PlanError};
use crate::AppState;

/// Create a router for plan related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", post(create_plan))
        .route("/snapshot", get(get_snapshot))
}

/// Plan request as received; either part may be missing
#[derive(Debug, Deserialize)]
pub struct PlanBody {
    pub finance: Option<FinanceSnapshot>,
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    /// `text` returns the rendered plan instead of JSON
    pub format: Option<String>,
}

pub async fn create_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
    body: Result<Json<PlanBody>, JsonRejection>,
) -> impl IntoResponse {
    info!("POST /api/plan");

    let request = match body {
        Ok(Json(PlanBody {
            finance: Some(finance),
            items: Some(items),
        })) => PlanRequest { finance, items },
        Ok(_) => {
            warn!("Plan request without finance or items");
            return missing_input();
        }
        Err(e) => {
            warn!("Unreadable plan request: {}", e);
            return missing_input();
        }
    };

    match state.plan_service.generate_plan(request).await {
        Ok(plan) => {
            if query.format.as_deref() == Some("text") {
                (StatusCode::OK, render_plan_text(&plan)).into_response()
            } else {
                (StatusCode::OK, Json(plan)).into_response()
            }
        }
        Err(PlanError::InFlight) => {
            warn!("Plan request refused, another one is running");
            error_response(
                StatusCode::CONFLICT,
                ErrorResponse::new(PlanError::InFlight.to_string()),
            )
        }
        Err(PlanError::Validation(e)) => {
            error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.to_string()))
        }
        Err(e) => {
            error!("Failed to generate plan: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Failed to generate plan", e.to_string()),
            )
        }
    }
}

/// The plan request body for the current saved state
pub async fn get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/snapshot");
    (StatusCode::OK, Json(state.planner_service.plan_request()))
}

fn missing_input() -> axum::response::Response {
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("Missing finance or items"),
    )
}
