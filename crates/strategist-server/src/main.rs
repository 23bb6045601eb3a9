//! Finance Strategist HTTP Server
//!
//! Axum server exposing the strategy pipeline, the economic data endpoints
//! and the static web UI.

mod config;
mod handlers;
mod state;

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finance_strategist::{DataSourceConfig, EconomicAnalyst, StrategyPipeline};

use crate::config::ServerConfig;
use crate::handlers::{
    api_info, country_info, create_strategy, create_strategy_from_text, health_check, indicators,
    list_models, market_overview, service_test, stock_history,
};
use crate::state::AppState;

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Strategy
        .route("/strategy", post(create_strategy))
        .route("/strategy/text", post(create_strategy_from_text))

        // Health & info
        .route("/health", get(health_check))
        .route("/test", get(service_test))
        .route("/api", get(api_info))
        .route("/api/models", get(list_models))

        // Economic data
        .route("/api/indicators/{country}", get(indicators))
        .route("/api/market", get(market_overview))
        .route("/api/stock/{symbol}", get(stock_history))
        .route("/api/country/{country}", get(country_info))

        // Static files (WASM frontend)
        .fallback_service(ServeDir::new(static_dir))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // LLM provider
    let provider = agent_runtime::provider_from_env()?;
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to {}", provider.name());
            if let Ok(models) = provider.list_models().await {
                tracing::info!("  {} models available", models.len());
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - strategies will use the rule-based fallback", provider.name());
        }
    }

    // Economic data sources
    let data_config = DataSourceConfig::from_env();
    if data_config.fred_api_key.is_some() {
        tracing::info!("✓ FRED API key configured");
    } else {
        tracing::warn!("⚠ FRED_API_KEY not set - US data falls back to World Bank and OECD");
    }
    let economy = EconomicAnalyst::from_config(&data_config)?;

    let state = AppState::new(StrategyPipeline::new(provider, economy));
    let app = build_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 finance strategist running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  POST /strategy              - Strategy from questionnaire");
    tracing::info!("  POST /strategy/text         - Strategy from free text");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  GET  /api                   - Endpoint list");
    tracing::info!("  GET  /api/indicators/:country");
    tracing::info!("  GET  /api/market?country=");
    tracing::info!("  GET  /api/stock/:symbol?range=");
    tracing::info!("  GET  /api/country/:country");
    tracing::info!("Serving UI from {}", config.static_dir.display());

    axum::serve(listener, app).await?;

    Ok(())
}
