//! External data source traits

use crate::types::RateTable;
use crate::Result;
use async_trait::async_trait;

/// Country directory provider
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Host or URL shown when the source is unavailable
    fn endpoint(&self) -> &str;

    /// Raw directory entries, left undecoded so a single malformed entry
    /// does not fail the whole fetch
    async fn fetch_countries(&self) -> Result<Vec<serde_json::Value>>;
}

/// Exchange rate provider
#[async_trait]
pub trait RateSource: Send + Sync {
    fn endpoint(&self) -> &str;
    async fn fetch_rates(&self) -> Result<RateTable>;
}
