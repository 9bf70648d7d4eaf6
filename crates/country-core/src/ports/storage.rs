//! Storage traits for persistence

use crate::types::{BatchReport, CountryFilter, CountryRecord, CountrySort, NewCountry};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Country store keyed by case-insensitive name
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Insert or overwrite the record with the same normalized name.
    /// Returns the stored record and whether it was newly created.
    async fn upsert_by_name(
        &self,
        country: &NewCountry,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(CountryRecord, bool)>;

    /// Upsert every country as one unit of work under the store's write lock.
    ///
    /// The batch is stamped with `now`, or with 1µs past the latest timestamp
    /// the store has issued if that is later, so timestamps never go
    /// backwards across overlapping batches. Records rejected by a constraint
    /// are reported in [`BatchReport::failures`]; any other storage failure
    /// aborts the batch.
    async fn upsert_batch(&self, countries: &[NewCountry], now: DateTime<Utc>)
        -> Result<BatchReport>;

    async fn get_by_name(&self, name: &str) -> Result<Option<CountryRecord>>;
    async fn list_all(&self, filter: &CountryFilter, sort: CountrySort)
        -> Result<Vec<CountryRecord>>;
    async fn count(&self) -> Result<i64>;
    async fn top_by_gdp(&self, limit: u32) -> Result<Vec<CountryRecord>>;
    async fn most_recent_refresh(&self) -> Result<Option<DateTime<Utc>>>;
    async fn delete(&self, name: &str) -> Result<bool>;
}
