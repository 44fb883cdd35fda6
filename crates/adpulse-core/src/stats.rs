// Aggregate result types
//
// Pure projections of the event collection at query time; no lifecycle
// beyond the request/response. Field names serialize in camelCase to match
// the public analytics shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventSource;

/// Event counts per source platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub facebook: u64,
    pub tiktok: u64,
}

/// Event counts per funnel stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelCounts {
    pub top: u64,
    pub bottom: u64,
}

/// Overall system statistics (composite of five independent counts)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_events: u64,
    pub events_by_source: SourceCounts,
    pub events_by_funnel: FunnelCounts,
    /// Percentage formatted to two decimal places; "0.00" when no
    /// top-of-funnel events exist
    pub conversion_rate: String,
}

/// One non-empty hour bucket of the event time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Bucket start (UTC, truncated to the hour)
    pub date: DateTime<Utc>,
    pub count: u64,
}

/// Event type frequency within one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeRanking {
    pub source: EventSource,
    pub event_type: String,
    pub count: u64,
}

/// Geographic rollup for one resolved country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    pub country: String,
    pub event_count: u64,
    /// Distinct users with a resolvable userId
    pub unique_users: u64,
    /// Events carrying a purchaseAmount value, valid or not
    pub total_purchases: u64,
    /// Sum over amounts that validate as strict decimals
    pub total_revenue: f64,
}

/// Funnel conversion for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelAnalysis {
    pub source: EventSource,
    pub top_events: u64,
    pub bottom_events: u64,
    /// Percentage rounded to two decimals; 0 when no top-of-funnel events
    pub conversion_rate: f64,
}

/// Generic ranked entity (campaign, user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntity {
    pub id: String,
    pub name: String,
    pub count: u64,
    /// Ranking-specific extra metric (campaign revenue, max followers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<f64>,
}

/// Revenue figures for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub total_revenue: f64,
    /// Presence count: any purchaseAmount value, numeric or not
    pub purchase_count: u64,
    /// Mean over the amounts that validated; 0 when none did
    pub average_order_value: f64,
}

/// Cross-source revenue totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTotals {
    pub total_revenue: f64,
    pub purchase_count: u64,
}

/// Complete revenue analysis across both sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueAnalysis {
    pub facebook: RevenueStats,
    pub tiktok: RevenueStats,
    pub total: RevenueTotals,
}
