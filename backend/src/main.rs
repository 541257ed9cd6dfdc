use dream_planner::config::AppConfig;
use dream_planner::domain::{compute_finance_summary, PlannerEvent};
use dream_planner::{create_router, initialize_backend};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let state = initialize_backend(&config)?;

    state.planner_service.subscribe(|event, data| match event {
        PlannerEvent::FinanceChanged => {
            let summary = compute_finance_summary(&data.finance);
            info!(
                "Finance updated: avg expense {:.0}, monthly savings {:.0}",
                summary.avg_expense, summary.monthly_savings
            );
        }
        PlannerEvent::ItemsChanged => info!("Dream list now has {} items", data.items.len()),
    });

    let app = create_router(state, &config)?;

    // Start the server
    let addr = config.socket_addr();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
