// Analytics HTTP routes
//
// Thin handlers: deserialize the bounded query parameters, call the engine,
// map the error taxonomy onto status codes. Invalid parameters are 400
// (rejected before any store access); store failures surface as 500.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use adpulse_analytics::AnalyticsEngine;
use adpulse_core::{
    AnalyticsError, CountryBreakdown, CountryQuery, EventTypeRanking, FunnelAnalysis,
    OverallStats, RevenueAnalysis, TimeSeriesPoint, TimeSeriesQuery, TopEntity, TopQuery,
    TopUsersQuery,
};

/// App state for analytics routes
#[derive(Clone)]
pub struct AppState {
    pub engine: AnalyticsEngine,
}

/// Create analytics routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/analytics/overview", get(overview))
        .route("/v1/analytics/timeseries", get(timeseries))
        .route("/v1/analytics/event-types", get(event_types))
        .route("/v1/analytics/countries", get(countries))
        .route("/v1/analytics/funnel", get(funnel))
        .route("/v1/analytics/top-campaigns", get(top_campaigns))
        .route("/v1/analytics/top-users", get(top_users))
        .route("/v1/analytics/revenue", get(revenue))
        .with_state(state)
}

fn into_status(err: AnalyticsError) -> (StatusCode, String) {
    match err {
        AnalyticsError::InvalidParameter(msg) => (StatusCode::BAD_REQUEST, msg),
        other => {
            tracing::error!("analytics query failed: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

/// GET /v1/analytics/overview - totals, per-source and per-stage counts
async fn overview(
    State(state): State<AppState>,
) -> Result<Json<OverallStats>, (StatusCode, String)> {
    let stats = state.engine.overall_stats().await.map_err(into_status)?;
    Ok(Json(stats))
}

/// GET /v1/analytics/timeseries - hourly counts over a look-back window
async fn timeseries(
    State(state): State<AppState>,
    Query(query): Query<TimeSeriesQuery>,
) -> Result<Json<Vec<TimeSeriesPoint>>, (StatusCode, String)> {
    let points = state
        .engine
        .event_time_series(query)
        .await
        .map_err(into_status)?;
    Ok(Json(points))
}

/// GET /v1/analytics/event-types - most frequent event types
async fn event_types(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<EventTypeRanking>>, (StatusCode, String)> {
    let ranked = state
        .engine
        .top_event_types(query)
        .await
        .map_err(into_status)?;
    Ok(Json(ranked))
}

/// GET /v1/analytics/countries - geographic breakdown
async fn countries(
    State(state): State<AppState>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<Vec<CountryBreakdown>>, (StatusCode, String)> {
    let rows = state
        .engine
        .country_breakdown(query.source)
        .await
        .map_err(into_status)?;
    Ok(Json(rows))
}

/// GET /v1/analytics/funnel - per-source conversion
async fn funnel(
    State(state): State<AppState>,
) -> Result<Json<Vec<FunnelAnalysis>>, (StatusCode, String)> {
    let rows = state.engine.funnel_analysis().await.map_err(into_status)?;
    Ok(Json(rows))
}

/// GET /v1/analytics/top-campaigns - facebook campaigns by conversions
async fn top_campaigns(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopEntity>>, (StatusCode, String)> {
    let ranked = state
        .engine
        .top_campaigns(query)
        .await
        .map_err(into_status)?;
    Ok(Json(ranked))
}

/// GET /v1/analytics/top-users - most active users for one source
async fn top_users(
    State(state): State<AppState>,
    Query(query): Query<TopUsersQuery>,
) -> Result<Json<Vec<TopEntity>>, (StatusCode, String)> {
    let ranked = state.engine.top_users(query).await.map_err(into_status)?;
    Ok(Json(ranked))
}

/// GET /v1/analytics/revenue - revenue per source plus totals
async fn revenue(
    State(state): State<AppState>,
) -> Result<Json<RevenueAnalysis>, (StatusCode, String)> {
    let analysis = state.engine.revenue_analysis().await.map_err(into_status)?;
    Ok(Json(analysis))
}
