// Row models for the events table

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use adpulse_core::{AnalyticsError, Event, EventSource, FunnelStage};

/// One row of the append-only events table
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub source: String,
    pub funnel_stage: String,
    pub event_type: String,
    pub payload: sqlx::types::JsonValue,
}

impl TryFrom<EventRow> for Event {
    type Error = AnalyticsError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            source: EventSource::from_str(&row.source).map_err(AnalyticsError::store)?,
            funnel_stage: FunnelStage::from_str(&row.funnel_stage).map_err(AnalyticsError::store)?,
            event_id: row.event_id,
            timestamp: row.timestamp,
            version: row.version,
            event_type: row.event_type,
            payload: row.payload,
        })
    }
}
