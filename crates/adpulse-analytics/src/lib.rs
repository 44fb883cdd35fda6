// Adpulse analytics: the aggregation engine
//
// Stateless read queries over an injected EventStore. Scalar filters are
// pushed to the store; payload-dependent grouping runs here via the
// canonical extractors so the semantics are identical over any backend.

pub mod engine;

pub use engine::AnalyticsEngine;
