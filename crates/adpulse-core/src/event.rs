// Domain entity types for stored behavioral events
//
// An event's payload is a schemaless JSON document whose expected shape is a
// function of `source` x `funnel_stage`. The shape is never assumed: all
// payload access goes through the extractors in `crate::extract`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advertising platform an event originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Facebook,
    Tiktok,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Facebook => "facebook",
            EventSource::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(EventSource::Facebook),
            "tiktok" => Ok(EventSource::Tiktok),
            other => Err(format!("unknown event source: {other}")),
        }
    }
}

/// Position in the conversion pipeline
///
/// `Top` is awareness/engagement, `Bottom` is action/conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Top,
    Bottom,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Top => "top",
            FunnelStage::Bottom => "bottom",
        }
    }
}

impl std::str::FromStr for FunnelStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(FunnelStage::Top),
            "bottom" => Ok(FunnelStage::Bottom),
            other => Err(format!("unknown funnel stage: {other}")),
        }
    }
}

/// Source selector for queries: a concrete platform or no filter at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    Facebook,
    Tiktok,
    #[default]
    All,
}

impl SourceFilter {
    /// The concrete source this filter selects, if any
    pub fn source(&self) -> Option<EventSource> {
        match self {
            SourceFilter::Facebook => Some(EventSource::Facebook),
            SourceFilter::Tiktok => Some(EventSource::Tiktok),
            SourceFilter::All => None,
        }
    }
}

/// One stored behavioral event, immutable once written
///
/// `event_id` is caller-supplied and opaque; duplicates are not deduplicated
/// here (retried deliveries inflate counts — an ingestion-side policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    /// Occurrence time, source-supplied (not ingestion time)
    pub timestamp: DateTime<Utc>,
    /// Schema version tag, informational only
    #[serde(default = "default_version")]
    pub version: String,
    pub source: EventSource,
    pub funnel_stage: FunnelStage,
    pub event_type: String,
    /// Source- and stage-specific nested document
    #[serde(rename = "data")]
    pub payload: serde_json::Value,
}

fn default_version() -> String {
    "v1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_wire_shape() {
        let json = r#"{
            "eventId": "evt_123456",
            "timestamp": "2023-12-01T10:30:00Z",
            "source": "facebook",
            "funnelStage": "bottom",
            "eventType": "checkout_complete",
            "data": {"user": {"userId": "u1"}}
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_id, "evt_123456");
        assert_eq!(event.source, EventSource::Facebook);
        assert_eq!(event.funnel_stage, FunnelStage::Bottom);
        assert_eq!(event.version, "v1");
        assert!(event.payload.get("user").is_some());
    }

    #[test]
    fn test_source_filter_roundtrip() {
        let all: SourceFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, SourceFilter::All);
        assert_eq!(all.source(), None);

        let fb: SourceFilter = serde_json::from_str("\"facebook\"").unwrap();
        assert_eq!(fb.source(), Some(EventSource::Facebook));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result: Result<EventSource, _> = serde_json::from_str("\"instagram\"");
        assert!(result.is_err());
    }
}
