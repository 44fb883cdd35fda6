// Typed query parameters with bounded ranges
//
// Parameters are validated before any store access; out-of-range values are
// an `InvalidParameter` error, distinct from store failures.

use serde::Deserialize;

use crate::error::{AnalyticsError, Result};
use crate::event::SourceFilter;

/// Largest look-back window for the time series (one week of hour buckets)
pub const MAX_LOOKBACK_HOURS: u32 = 168;

/// Largest top-N result limit
pub const MAX_RESULT_LIMIT: usize = 100;

fn default_hours() -> u32 {
    24
}

fn default_limit() -> usize {
    10
}

/// Parameters for the hourly event time series
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeSeriesQuery {
    /// Number of hours to look back (1..=168)
    #[serde(default = "default_hours")]
    pub hours: u32,
    /// Optional source filter; `all` means no filter
    #[serde(default)]
    pub source: SourceFilter,
}

impl Default for TimeSeriesQuery {
    fn default() -> Self {
        Self {
            hours: default_hours(),
            source: SourceFilter::All,
        }
    }
}

impl TimeSeriesQuery {
    pub fn validate(&self) -> Result<()> {
        if self.hours < 1 || self.hours > MAX_LOOKBACK_HOURS {
            return Err(AnalyticsError::param(format!(
                "hours must be between 1 and {MAX_LOOKBACK_HOURS}, got {}",
                self.hours
            )));
        }
        Ok(())
    }
}

/// Parameters for top-N rankings (event types, campaigns)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TopQuery {
    /// Maximum number of results (1..=100)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for TopQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl TopQuery {
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.limit)
    }
}

/// Parameters for the top-users ranking; the source is required here because
/// the result shape is source-specific
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TopUsersQuery {
    pub source: SourceFilter,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl TopUsersQuery {
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.limit)
    }
}

/// Parameters for the country breakdown
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CountryQuery {
    #[serde(default)]
    pub source: SourceFilter,
}

fn validate_limit(limit: usize) -> Result<()> {
    if limit < 1 || limit > MAX_RESULT_LIMIT {
        return Err(AnalyticsError::param(format!(
            "limit must be between 1 and {MAX_RESULT_LIMIT}, got {limit}"
        )));
    }
    Ok(())
}
