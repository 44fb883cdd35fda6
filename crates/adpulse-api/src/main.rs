// Adpulse API server
//
// Thin HTTP surface over the aggregation engine: one route per analytics
// query, a webhook ingestion route, and a health probe. All query semantics
// live in adpulse-analytics; this binary only wires config, storage, and
// serialization together.

mod analytics;
mod config;
mod webhook;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adpulse_analytics::AnalyticsEngine;
use adpulse_storage::PgEventStore;

use crate::config::Config;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adpulse_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("adpulse-api starting...");

    let config = Config::from_env()?;

    let store = PgEventStore::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    store.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    let store = Arc::new(store);
    let engine = AnalyticsEngine::new(store.clone());

    let analytics_state = analytics::AppState { engine };
    let webhook_state = webhook::AppState {
        store: store.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .merge(analytics::routes(analytics_state))
        .merge(webhook::routes(webhook_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
