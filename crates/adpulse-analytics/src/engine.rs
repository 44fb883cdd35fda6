// Aggregation queries over the event collection
//
// Every query is a pure read as of call time. Rankings order by the stated
// metric descending with ties broken by identifier ascending, so results are
// reproducible regardless of store iteration order. Limits truncate after
// ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use adpulse_core::extract;
use adpulse_core::{
    CountryBreakdown, Event, EventFilter, EventSource, EventStore, EventTypeRanking,
    FunnelAnalysis, FunnelCounts, FunnelStage, OverallStats, Result, RevenueAnalysis,
    RevenueStats, RevenueTotals, SourceCounts, TimeSeriesPoint, TimeSeriesQuery, TopEntity,
    TopQuery, TopUsersQuery, SourceFilter,
};

/// Truncate a timestamp to the start of its UTC hour
pub fn hour_bucket(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp() - ts.timestamp().rem_euclid(3600);
    DateTime::from_timestamp(secs, 0).unwrap_or(ts)
}

/// Bottom-over-top conversion percentage rounded to two decimals; 0 when the
/// top of the funnel is empty (guard, not an error)
fn conversion_pct(top: u64, bottom: u64) -> f64 {
    if top == 0 {
        return 0.0;
    }
    let rate = bottom as f64 / top as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// The aggregation engine
///
/// Stateless and read-only; safe to share across concurrent callers. The
/// store handle is injected at construction — no process-wide state.
#[derive(Clone)]
pub struct AnalyticsEngine {
    store: Arc<dyn EventStore>,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Composite overview: five independent counts issued concurrently.
    /// Any sub-count failure fails the whole call; no partial composite.
    pub async fn overall_stats(&self) -> Result<OverallStats> {
        tracing::debug!("computing overall stats");

        let all_filter = EventFilter::all();
        let facebook_filter = EventFilter::source(EventSource::Facebook);
        let tiktok_filter = EventFilter::source(EventSource::Tiktok);
        let top_filter = EventFilter::funnel_stage(FunnelStage::Top);
        let bottom_filter = EventFilter::funnel_stage(FunnelStage::Bottom);
        let (total, facebook, tiktok, top, bottom) = tokio::try_join!(
            self.store.count(&all_filter),
            self.store.count(&facebook_filter),
            self.store.count(&tiktok_filter),
            self.store.count(&top_filter),
            self.store.count(&bottom_filter),
        )?;

        let conversion_rate = if top > 0 {
            format!("{:.2}", bottom as f64 / top as f64 * 100.0)
        } else {
            "0.00".to_string()
        };

        Ok(OverallStats {
            total_events: total,
            events_by_source: SourceCounts { facebook, tiktok },
            events_by_funnel: FunnelCounts { top, bottom },
            conversion_rate,
        })
    }

    /// Hourly event counts over a bounded look-back window. Only buckets with
    /// at least one event are emitted, ascending by bucket start.
    pub async fn event_time_series(&self, query: TimeSeriesQuery) -> Result<Vec<TimeSeriesPoint>> {
        query.validate()?;
        tracing::debug!(hours = query.hours, source = ?query.source, "computing time series");

        let mut filter = EventFilter::all()
            .with_since(Utc::now() - Duration::hours(i64::from(query.hours)));
        filter.source = query.source.source();

        let events = self.store.fetch(&filter).await?;

        let mut buckets: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
        for event in &events {
            *buckets.entry(hour_bucket(event.timestamp)).or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|(date, count)| TimeSeriesPoint { date, count })
            .collect())
    }

    /// Most frequent `(source, event_type)` pairs
    pub async fn top_event_types(&self, query: TopQuery) -> Result<Vec<EventTypeRanking>> {
        query.validate()?;
        tracing::debug!(limit = query.limit, "computing top event types");

        let events = self.store.fetch(&EventFilter::all()).await?;

        let mut groups: BTreeMap<(EventSource, String), u64> = BTreeMap::new();
        for event in events {
            *groups.entry((event.source, event.event_type)).or_default() += 1;
        }

        let mut ranked: Vec<EventTypeRanking> = groups
            .into_iter()
            .map(|((source, event_type), count)| EventTypeRanking {
                source,
                event_type,
                count,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.event_type.cmp(&b.event_type))
        });
        ranked.truncate(query.limit);
        Ok(ranked)
    }

    /// Geographic rollup keyed by the canonical country accessor (facebook
    /// path first, tiktok path as fallback). Events with no resolvable
    /// country are excluded, even under `All`. Top 20 groups by event count.
    pub async fn country_breakdown(&self, source: SourceFilter) -> Result<Vec<CountryBreakdown>> {
        tracing::debug!(source = ?source, "computing country breakdown");

        let mut filter = EventFilter::all();
        filter.source = source.source();
        let events = self.store.fetch(&filter).await?;

        #[derive(Default)]
        struct CountryAcc {
            event_count: u64,
            users: BTreeSet<String>,
            total_purchases: u64,
            total_revenue: f64,
        }

        let mut groups: BTreeMap<String, CountryAcc> = BTreeMap::new();
        for event in &events {
            let Some(country) = extract::country(&event.payload) else {
                continue;
            };
            let acc = groups.entry(country.to_string()).or_default();
            acc.event_count += 1;
            if let Some(user_id) = extract::user_id(&event.payload) {
                acc.users.insert(user_id.to_string());
            }
            // Presence test: any non-null value counts as a purchase event
            if extract::purchase_amount_raw(&event.payload).is_some() {
                acc.total_purchases += 1;
            }
            if let Some(amount) = extract::purchase_amount(&event.payload) {
                acc.total_revenue += amount;
            }
        }

        let mut rows: Vec<CountryBreakdown> = groups
            .into_iter()
            .map(|(country, acc)| CountryBreakdown {
                country,
                event_count: acc.event_count,
                unique_users: acc.users.len() as u64,
                total_purchases: acc.total_purchases,
                total_revenue: acc.total_revenue,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.event_count
                .cmp(&a.event_count)
                .then_with(|| a.country.cmp(&b.country))
        });
        rows.truncate(20);
        Ok(rows)
    }

    /// Per-source funnel conversion. One row per source with at least one
    /// event, ordered by source name; a stage missing for a source counts 0.
    pub async fn funnel_analysis(&self) -> Result<Vec<FunnelAnalysis>> {
        tracing::debug!("computing funnel analysis");

        let events = self.store.fetch(&EventFilter::all()).await?;

        let mut groups: BTreeMap<EventSource, (u64, u64)> = BTreeMap::new();
        for event in &events {
            let counts = groups.entry(event.source).or_default();
            match event.funnel_stage {
                FunnelStage::Top => counts.0 += 1,
                FunnelStage::Bottom => counts.1 += 1,
            }
        }

        Ok(groups
            .into_iter()
            .map(|(source, (top, bottom))| FunnelAnalysis {
                source,
                top_events: top,
                bottom_events: bottom,
                conversion_rate: conversion_pct(top, bottom),
            })
            .collect())
    }

    /// Facebook campaigns ranked by conversion count; `metric` is the summed
    /// validated purchase revenue (0 when no amount in the group validates)
    pub async fn top_campaigns(&self, query: TopQuery) -> Result<Vec<TopEntity>> {
        query.validate()?;
        tracing::debug!(limit = query.limit, "computing top campaigns");

        let events = self
            .store
            .fetch(&EventFilter::source(EventSource::Facebook))
            .await?;

        #[derive(Default)]
        struct CampaignAcc {
            count: u64,
            revenue: f64,
        }

        let mut groups: BTreeMap<String, CampaignAcc> = BTreeMap::new();
        for event in &events {
            let Some(campaign_id) = extract::campaign_id(&event.payload) else {
                continue;
            };
            let acc = groups.entry(campaign_id.to_string()).or_default();
            acc.count += 1;
            if let Some(amount) = extract::purchase_amount(&event.payload) {
                acc.revenue += amount;
            }
        }

        let mut ranked: Vec<TopEntity> = groups
            .into_iter()
            .map(|(id, acc)| TopEntity {
                name: id.clone(),
                id,
                count: acc.count,
                metric: Some(acc.revenue),
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(query.limit);
        Ok(ranked)
    }

    /// Most active users for one concrete source. The shape is source
    /// specific: tiktok rows additionally carry `metric = max(followers)`
    /// over the group's validated readings. A non-concrete source yields an
    /// empty result, not an error.
    pub async fn top_users(&self, query: TopUsersQuery) -> Result<Vec<TopEntity>> {
        query.validate()?;
        tracing::debug!(source = ?query.source, limit = query.limit, "computing top users");

        let Some(source) = query.source.source() else {
            return Ok(Vec::new());
        };

        let events = self.store.fetch(&EventFilter::source(source)).await?;

        #[derive(Default)]
        struct UserAcc {
            count: u64,
            max_followers: Option<u64>,
        }

        // Events with an absent userId are excluded from grouping; an absent
        // display name still forms a group and serializes as an empty string.
        let mut groups: BTreeMap<(String, Option<String>), UserAcc> = BTreeMap::new();
        for event in &events {
            let Some(user_id) = extract::user_id(&event.payload) else {
                continue;
            };
            let name = extract::display_name(source, &event.payload).map(str::to_string);
            let acc = groups.entry((user_id.to_string(), name)).or_default();
            acc.count += 1;
            if source == EventSource::Tiktok {
                if let Some(followers) = extract::follower_count(&event.payload) {
                    acc.max_followers =
                        Some(acc.max_followers.map_or(followers, |m| m.max(followers)));
                }
            }
        }

        let mut ranked: Vec<TopEntity> = groups
            .into_iter()
            .map(|((id, name), acc)| TopEntity {
                id,
                name: name.unwrap_or_default(),
                count: acc.count,
                metric: match source {
                    EventSource::Facebook => None,
                    EventSource::Tiktok => Some(acc.max_followers.unwrap_or(0) as f64),
                },
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(query.limit);
        Ok(ranked)
    }

    /// Revenue per source plus cross-source totals. `purchase_count` is a
    /// presence count; `total_revenue` and the average only see amounts that
    /// validated as strict decimals.
    pub async fn revenue_analysis(&self) -> Result<RevenueAnalysis> {
        tracing::debug!("computing revenue analysis");

        let events = self.store.fetch(&EventFilter::all()).await?;

        #[derive(Default)]
        struct RevenueAcc {
            revenue: f64,
            presence: u64,
            valid: u64,
        }

        impl RevenueAcc {
            fn observe(&mut self, event: &Event) {
                if let Some(raw) = extract::purchase_amount_raw(&event.payload) {
                    self.presence += 1;
                    if let Some(amount) = adpulse_core::numeric::parse_strict_decimal(raw) {
                        self.revenue += amount;
                        self.valid += 1;
                    }
                }
            }

            fn stats(&self) -> RevenueStats {
                RevenueStats {
                    total_revenue: self.revenue,
                    purchase_count: self.presence,
                    average_order_value: if self.valid > 0 {
                        self.revenue / self.valid as f64
                    } else {
                        0.0
                    },
                }
            }
        }

        let mut facebook = RevenueAcc::default();
        let mut tiktok = RevenueAcc::default();
        for event in &events {
            match event.source {
                EventSource::Facebook => facebook.observe(event),
                EventSource::Tiktok => tiktok.observe(event),
            }
        }

        Ok(RevenueAnalysis {
            facebook: facebook.stats(),
            tiktok: tiktok.stats(),
            total: RevenueTotals {
                total_revenue: facebook.revenue + tiktok.revenue,
                purchase_count: facebook.presence + tiktok.presence,
            },
        })
    }
}
