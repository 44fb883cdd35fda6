// In-memory event store for tests and examples
//
// Keeps the whole collection in a Vec behind an RwLock. Append-only like the
// real store; no update or delete surface.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::event::Event;
use crate::traits::{EventFilter, EventStore};

/// In-memory event store
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append one event
    pub async fn insert(&self, event: Event) {
        self.events.write().await.push(event);
    }

    /// Pre-populate with events (useful for testing)
    pub async fn seed(&self, events: Vec<Event>) {
        self.events.write().await.extend(events);
    }

    /// Drop all events
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    /// Number of stored events, unfiltered
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn fetch(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventSource, FunnelStage};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn event(source: EventSource, stage: FunnelStage, hours_ago: i64) -> Event {
        Event {
            event_id: format!("evt-{source}-{hours_ago}"),
            timestamp: Utc::now() - Duration::hours(hours_ago),
            version: "v1".to_string(),
            source,
            funnel_stage: stage,
            event_type: "page_view".to_string(),
            payload: json!({}),
        }
    }

    #[tokio::test]
    async fn test_count_applies_filters() {
        let store = InMemoryEventStore::new();
        store
            .seed(vec![
                event(EventSource::Facebook, FunnelStage::Top, 1),
                event(EventSource::Facebook, FunnelStage::Bottom, 2),
                event(EventSource::Tiktok, FunnelStage::Top, 30),
            ])
            .await;

        assert_eq!(store.count(&EventFilter::all()).await.unwrap(), 3);
        assert_eq!(
            store
                .count(&EventFilter::source(EventSource::Facebook))
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            store
                .count(&EventFilter::funnel_stage(FunnelStage::Top))
                .await
                .unwrap(),
            2
        );
        let recent = EventFilter::all().with_since(Utc::now() - Duration::hours(24));
        assert_eq!(store.count(&recent).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_combined_filter() {
        let store = InMemoryEventStore::new();
        store
            .seed(vec![
                event(EventSource::Facebook, FunnelStage::Top, 1),
                event(EventSource::Tiktok, FunnelStage::Top, 1),
                event(EventSource::Tiktok, FunnelStage::Top, 48),
            ])
            .await;

        let filter = EventFilter::source(EventSource::Tiktok)
            .with_since(Utc::now() - Duration::hours(24));
        let events = store.fetch(&filter).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, EventSource::Tiktok);
    }
}
