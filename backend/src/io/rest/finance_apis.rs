//! # REST API for Finance
//!
//! Monthly income, the expense history table and the derived summary.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use shared::{ErrorResponse, RemoveResponse, UpdateExpenseRowRequest, UpdateIncomeRequest};
use tracing::{error, info};

use super::{error_response, planner_error_response, run_planner};
use crate::domain::PlannerService;
use crate::AppState;

/// Create a router for finance related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_finance))
        .route("/income", put(update_income))
        .route("/expenses", post(add_expense_row))
        .route("/expenses/:id", put(update_expense_row).delete(remove_expense_row))
        .route("/summary", get(get_finance_summary))
}

/// Current income and expense history
pub async fn get_finance(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/finance");
    (StatusCode::OK, Json(state.planner_service.finance()))
}

pub async fn update_income(
    State(state): State<AppState>,
    body: Result<Json<UpdateIncomeRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/finance/income");

    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            error!("Unreadable income body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.body_text()));
        }
    };

    match run_planner(&state.planner_service, move |s| s.set_income(request.income)).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => planner_error_response(e),
    }
}

/// Append an empty expense row
pub async fn add_expense_row(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/finance/expenses");

    match run_planner(&state.planner_service, |s| s.add_expense_row()).await {
        Ok(row) => (StatusCode::CREATED, Json(row)).into_response(),
        Err(e) => planner_error_response(e),
    }
}

/// Edit the label and/or amount of one expense row
pub async fn update_expense_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateExpenseRowRequest>, JsonRejection>,
) -> impl IntoResponse {
    info!("PUT /api/finance/expenses/{}", id);

    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            error!("Unreadable expense row body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.body_text()));
        }
    };

    let change = move |s: &PlannerService| s.update_expense_row(&id, request.label, request.amount);
    match run_planner(&state.planner_service, change).await {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(e) => planner_error_response(e),
    }
}

pub async fn remove_expense_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/finance/expenses/{}", id);

    match run_planner(&state.planner_service, move |s| s.remove_expense_row(&id)).await {
        Ok(removed) => (StatusCode::OK, Json(RemoveResponse { removed })).into_response(),
        Err(e) => planner_error_response(e),
    }
}

/// Average expense and monthly savings with their display labels
pub async fn get_finance_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/finance/summary");
    (StatusCode::OK, Json(state.planner_service.finance_summary()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{read_json, send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use shared::{ExpenseEntry, FinanceProfile, FinanceSummaryResponse};

    #[tokio::test]
    async fn test_income_and_expenses_drive_summary() {
        let (app, _) = test_app("{}");

        let response = send(&app, Method::PUT, "/api/finance/income", Some(json!({"income": 50000}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::POST, "/api/finance/expenses", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let row: ExpenseEntry = read_json(response).await;
        assert_eq!(row.amount, 0.0);

        let uri = format!("/api/finance/expenses/{}", row.id);
        let response = send(&app, Method::PUT, &uri, Some(json!({"label": "Sep", "amount": 30000}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/api/finance/summary", None).await;
        let summary: FinanceSummaryResponse = read_json(response).await;
        assert_eq!(summary.summary.avg_expense, 30000.0);
        assert_eq!(summary.summary.monthly_savings, 20000.0);
        assert_eq!(summary.monthly_savings_label, "Estimated monthly savings: ₹20000");

        let response = send(&app, Method::GET, "/api/finance", None).await;
        let profile: FinanceProfile = read_json(response).await;
        assert_eq!(profile.income, 50000.0);
        assert_eq!(profile.expense_history.len(), 1);
        assert_eq!(profile.expense_history[0].label, "Sep");
    }

    #[tokio::test]
    async fn test_expense_amount_is_read_like_form_input() {
        let (app, _) = test_app("{}");

        let response = send(&app, Method::POST, "/api/finance/expenses", None).await;
        let row: ExpenseEntry = read_json(response).await;
        let uri = format!("/api/finance/expenses/{}", row.id);

        let response = send(&app, Method::PUT, &uri, Some(json!({"label": "Jul", "amount": "1500"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let row: ExpenseEntry = read_json(response).await;
        assert_eq!(row.amount, 1500.0);

        // null leaves a field unchanged
        let response = send(&app, Method::PUT, &uri, Some(json!({"label": null, "amount": null}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let row: ExpenseEntry = read_json(response).await;
        assert_eq!(row.label, "Jul");
        assert_eq!(row.amount, 1500.0);

        let response = send(&app, Method::PUT, &uri, Some(json!({"amount": "abc"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let row: ExpenseEntry = read_json(response).await;
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.label, "Jul");
    }

    #[tokio::test]
    async fn test_unknown_expense_row_is_not_found() {
        let (app, _) = test_app("{}");

        let response = send(&app, Method::PUT, "/api/finance/expenses/missing", Some(json!({"amount": 5}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, "/api/finance/expenses/missing", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = read_json(response).await;
        assert_eq!(body, json!({"removed": false}));
    }

    #[tokio::test]
    async fn test_unreadable_income_body_is_bad_request() {
        let (app, _) = test_app("{}");

        let response = send(&app, Method::PUT, "/api/finance/income", Some(json!("not an object"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(response).await;
        assert!(body["error"].is_string());
    }
}
