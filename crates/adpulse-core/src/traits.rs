// Store seam for the aggregation engine
//
// The engine is written against this trait so the same query semantics hold
// over different backends:
// - Postgres implementation for production (adpulse-storage)
// - In-memory implementation for tests and examples (crate::memory)
//
// Exact-match and range filters are pushed through `EventFilter`;
// payload-dependent grouping stays in the engine, built on `crate::extract`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::event::{Event, EventSource, FunnelStage};

/// Store-level filter over the scalar event columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub source: Option<EventSource>,
    pub funnel_stage: Option<FunnelStage>,
    /// Inclusive lower bound on the event timestamp
    pub since: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Filter that matches every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn source(source: EventSource) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    pub fn funnel_stage(stage: FunnelStage) -> Self {
        Self {
            funnel_stage: Some(stage),
            ..Self::default()
        }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Whether an event passes this filter (used by in-memory stores)
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(source) = self.source {
            if event.source != source {
                return false;
            }
        }
        if let Some(stage) = self.funnel_stage {
            if event.funnel_stage != stage {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// Read access to the append-only event collection
///
/// Implementations must be safe to share across concurrent queries; the
/// engine never writes through this trait.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Count events matching the filter
    async fn count(&self, filter: &EventFilter) -> Result<u64>;

    /// Fetch events matching the filter for in-engine aggregation
    async fn fetch(&self, filter: &EventFilter) -> Result<Vec<Event>>;
}
