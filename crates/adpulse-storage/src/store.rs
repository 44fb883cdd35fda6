// Postgres-backed event store
//
// Scalar filters (source, funnel stage, timestamp range) are pushed into the
// WHERE clause; payload-dependent grouping happens in the analytics engine.
// The migration provisions expression indexes on the canonical JSONB paths
// so filtered fetches stay cheap as the collection grows.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use adpulse_core::{AnalyticsError, Event, EventFilter, EventStore, Result};

use crate::models::EventRow;

/// Postgres event store
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a store from a database URL
    pub async fn from_url(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the bundled migrations (events table + JSONB path indexes)
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Append one event; the collection is append-only, duplicates by
    /// event_id are stored as-is
    pub async fn insert_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (event_id, timestamp, version, source, funnel_stage, event_type, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&event.event_id)
        .bind(event.timestamp)
        .bind(&event.version)
        .bind(event.source.as_str())
        .bind(event.funnel_stage.as_str())
        .bind(&event.event_type)
        .bind(&event.payload)
        .execute(&self.pool)
        .await
        .map_err(|e| AnalyticsError::store(e.to_string()))?;

        Ok(())
    }

    /// Append a batch atomically
    pub async fn insert_batch(&self, events: &[Event]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AnalyticsError::store(e.to_string()))?;

        for event in events {
            sqlx::query(
                r#"
                INSERT INTO events (event_id, timestamp, version, source, funnel_stage, event_type, payload)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&event.event_id)
            .bind(event.timestamp)
            .bind(&event.version)
            .bind(event.source.as_str())
            .bind(event.funnel_stage.as_str())
            .bind(&event.event_type)
            .bind(&event.payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| AnalyticsError::store(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AnalyticsError::store(e.to_string()))?;

        tracing::debug!(count = events.len(), "inserted event batch");
        Ok(())
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    let mut sep = " WHERE ";
    if let Some(source) = filter.source {
        qb.push(sep).push("source = ").push_bind(source.as_str());
        sep = " AND ";
    }
    if let Some(stage) = filter.funnel_stage {
        qb.push(sep)
            .push("funnel_stage = ")
            .push_bind(stage.as_str());
        sep = " AND ";
    }
    if let Some(since) = filter.since {
        qb.push(sep).push("timestamp >= ").push_bind(since);
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn count(&self, filter: &EventFilter) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AnalyticsError::store(e.to_string()))?;

        Ok(count as u64)
    }

    async fn fetch(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT event_id, timestamp, version, source, funnel_stage, event_type, payload FROM events",
        );
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY timestamp ASC");

        let rows: Vec<EventRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AnalyticsError::store(e.to_string()))?;

        rows.into_iter().map(Event::try_from).collect()
    }
}
