//! # REST API Interface Layer
//!
//! HTTP endpoints for the dream purchase planner. Handlers only translate
//! between JSON and the domain services:
//! - request bodies are read leniently and handed to the domain unchanged
//! - domain errors become status codes with an [`ErrorResponse`] body
//! - every request is logged as `METHOD /path`
//!
//! Each module exposes a `router()` that `create_router` mounts under `/api`.

pub mod finance_apis;
pub mod item_apis;
pub mod plan_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::{PlannerError, PlannerService, ValidationError};

pub(crate) fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(error)).into_response()
}

/// Run a planner mutation on the blocking pool; mutations write the state
/// file while holding the state lock
pub(crate) async fn run_planner<T, F>(service: &PlannerService, change: F) -> Result<T, PlannerError>
where
    T: Send + 'static,
    F: FnOnce(&PlannerService) -> Result<T, PlannerError> + Send + 'static,
{
    let service = service.clone();
    tokio::task::spawn_blocking(move || change(&service))
        .await
        .map_err(|e| PlannerError::Storage(format!("planner task failed: {}", e)))?
}

/// Map a planner failure to its HTTP status
pub(crate) fn planner_error_response(e: PlannerError) -> Response {
    match e {
        PlannerError::Validation(ValidationError::UnknownExpenseRow(id)) => error_response(
            StatusCode::NOT_FOUND,
            ErrorResponse::new(format!("Unknown expense row: {}", id)),
        ),
        PlannerError::Validation(e) => {
            error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.to_string()))
        }
        PlannerError::Storage(details) => {
            error!("Planner storage failure: {}", details);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Failed to save changes", details),
            )
        }
    }
}
