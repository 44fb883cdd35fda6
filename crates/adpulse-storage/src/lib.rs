// Adpulse storage: Postgres-backed EventStore
//
// The events table is append-only. Enum columns are stored as text and
// re-parsed on read; payloads live in a JSONB column with expression
// indexes on the canonical extraction paths.

pub mod models;
pub mod store;

pub use store::PgEventStore;
