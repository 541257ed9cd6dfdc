//! # Dream Planner Backend
//!
//! Budgeting for a wishlist of "dream" purchases: a finance profile built
//! from monthly income and past expenses, an affordability estimate for
//! each item, and an AI-generated month-by-month purchase plan.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, plan provider, plan client)
//!     ↓
//! Domain Layer (finance, affordability, plan normalizer, services)
//!     ↓
//! Storage Layer (key-value store holding the saved state)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{PlanProvider, PlanService, PlannerService};
use crate::io::rest::{finance_apis, item_apis, plan_apis};
use crate::io::OpenRouterProvider;
use crate::storage::{JsonFileStore, StateRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub planner_service: PlannerService,
    pub plan_service: PlanService,
}

impl AppState {
    pub fn new(repository: StateRepository, provider: Arc<dyn PlanProvider>) -> Self {
        Self {
            planner_service: PlannerService::new(repository),
            plan_service: PlanService::new(provider),
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let store = JsonFileStore::new(&config.data_dir).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?;
    let repository = StateRepository::new(Arc::new(store));

    info!("Setting up plan provider ({})", config.plan_model);
    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set, plan requests will fail");
    }
    let provider = OpenRouterProvider::from_config(config);

    Ok(AppState::new(repository, Arc::new(provider)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match &config.cors_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS_ORIGIN: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    };

    let api_routes = Router::new()
        .nest("/finance", finance_apis::router())
        .nest("/items", item_apis::router())
        .merge(plan_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::plan_service::tests::CannedProvider;
    use crate::storage::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Router over in-memory storage whose provider always answers `plan_reply`
    pub(crate) fn test_app(plan_reply: &str) -> (Router, AppState) {
        test_app_with(Arc::new(CannedProvider::ok(plan_reply)))
    }

    pub(crate) fn test_app_with(provider: Arc<dyn PlanProvider>) -> (Router, AppState) {
        let repository = StateRepository::new(Arc::new(MemoryStore::new()));
        let state = AppState::new(repository, provider);
        let router = create_router(state.clone(), &AppConfig::default()).unwrap();
        (router, state)
    }

    pub(crate) async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    pub(crate) async fn read_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        serde_json::from_str(&read_text(response).await).unwrap()
    }
}
