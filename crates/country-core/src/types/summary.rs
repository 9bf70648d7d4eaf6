//! Refresh and status summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one refresh run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub message: String,
    pub total_countries: i64,
    pub created: usize,
    pub updated: usize,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Counts produced by a batch upsert
#[derive(Debug)]
pub struct BatchReport {
    /// Timestamp written to every stored record of the batch
    pub refreshed_at: DateTime<Utc>,
    pub created: usize,
    pub updated: usize,
    /// Name and error of each record the store rejected
    pub failures: Vec<(String, crate::CountryError)>,
}

/// Aggregates fed to the summary renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_countries: i64,
    pub top_countries: Vec<(String, Option<f64>)>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub total_countries: i64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}
