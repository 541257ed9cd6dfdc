//! # REST API for Dream Items
//!
//! The wishlist, sorted by priority then price, with an affordability
//! estimate per item.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use chrono::Local;
use shared::{CreateItemRequest, CreateItemResponse, ErrorResponse, RemoveResponse};
use tracing::{error, info};

use super::{error_response, planner_error_response, run_planner};
use crate::AppState;

/// Create a router for item related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", delete(remove_item))
}

pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/items");
    let today = Local::now().date_naive();
    (StatusCode::OK, Json(state.planner_service.item_list(today)))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<CreateItemRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            error!("Unreadable item body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.body_text()));
        }
    };
    info!("POST /api/items - request: {:?}", request);

    match run_planner(&state.planner_service, move |s| s.add_item(request)).await {
        Ok(item) => {
            let success_message = format!("Added \"{}\" to your dream list", item.name);
            (
                StatusCode::CREATED,
                Json(CreateItemResponse {
                    item,
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to add item: {}", e);
            planner_error_response(e)
        }
    }
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/items/{}", id);

    match run_planner(&state.planner_service, move |s| s.remove_item(&id)).await {
        Ok(removed) => (StatusCode::OK, Json(RemoveResponse { removed })).into_response(),
        Err(e) => planner_error_response(e),
    }
}
