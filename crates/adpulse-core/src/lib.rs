// Adpulse core: domain model and canonical field extraction
//
// This crate is backend-agnostic. It defines:
// - The stored event model (schemaless payload per source x funnel stage)
// - Canonical field extraction that never fails, only degrades to absent
// - Strict validation for string-transported numerics (single source of truth)
// - Bounded query parameter types and the aggregate result shapes
// - The EventStore trait that storage backends implement
// - An in-memory store for tests and examples

pub mod error;
pub mod event;
pub mod extract;
pub mod memory;
pub mod numeric;
pub mod query;
pub mod stats;
pub mod traits;

// Re-exports for convenience
pub use error::{AnalyticsError, Result};
pub use event::{Event, EventSource, FunnelStage, SourceFilter};
pub use memory::InMemoryEventStore;
pub use query::{CountryQuery, TimeSeriesQuery, TopQuery, TopUsersQuery};
pub use stats::{
    CountryBreakdown, EventTypeRanking, FunnelAnalysis, FunnelCounts, OverallStats,
    RevenueAnalysis, RevenueStats, RevenueTotals, SourceCounts, TimeSeriesPoint, TopEntity,
};
pub use traits::{EventFilter, EventStore};
