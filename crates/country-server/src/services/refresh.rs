//! Refresh orchestration
//!
//! One run fetches the country directory and the exchange rates under a
//! shared deadline, enriches every entry, upserts the batch in a single
//! transaction and then hands the summary image off to a detached task.

use chrono::Utc;
use country_core::ports::{CountrySource, CountryStore, RateSource, SummaryRenderer};
use country_core::{
    enrich_country, CountryError, DataSource, GdpMultiplier, RateTable, RefreshSummary, Result,
    SummaryStats,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

pub struct RefreshService {
    store: Arc<dyn CountryStore>,
    countries: Arc<dyn CountrySource>,
    rates: Arc<dyn RateSource>,
    renderer: Arc<dyn SummaryRenderer>,
    multiplier: Arc<dyn GdpMultiplier>,
    timeout: Duration,
    top_n: u32,
}

impl RefreshService {
    pub fn new(
        store: Arc<dyn CountryStore>,
        countries: Arc<dyn CountrySource>,
        rates: Arc<dyn RateSource>,
        renderer: Arc<dyn SummaryRenderer>,
        multiplier: Arc<dyn GdpMultiplier>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            countries,
            rates,
            renderer,
            multiplier,
            timeout,
            top_n: 5,
        }
    }

    pub fn with_top_n(mut self, top_n: u32) -> Self {
        self.top_n = top_n;
        self
    }

    pub async fn run(&self) -> Result<RefreshSummary> {
        info!("Starting refresh run");

        let (entries, rates) = self.fetch_sources().await?;
        info!(
            "Fetched {} countries and {} exchange rates",
            entries.len(),
            rates.len()
        );

        let mut prepared = Vec::with_capacity(entries.len());
        for entry in entries {
            match enrich_country(entry, &rates, self.multiplier.as_ref()) {
                Ok(country) => prepared.push(country),
                Err(e) => warn!("{}", e),
            }
        }

        let report = self.store.upsert_batch(&prepared, Utc::now()).await?;
        for (name, e) in &report.failures {
            warn!("Failed to store country {}: {}", name, e);
        }

        let total_countries = self.store.count().await?;
        info!(
            "Refresh complete: total={}, created={}, updated={}, skipped={}",
            total_countries,
            report.created,
            report.updated,
            report.failures.len()
        );

        self.spawn_render();

        Ok(RefreshSummary {
            message: "Countries refreshed successfully".to_string(),
            total_countries,
            created: report.created,
            updated: report.updated,
            last_refreshed_at: report.refreshed_at,
        })
    }

    async fn fetch_sources(&self) -> Result<(Vec<serde_json::Value>, RateTable)> {
        let deadline = Instant::now() + self.timeout;

        let countries = async {
            match timeout_at(deadline, self.countries.fetch_countries()).await {
                Ok(result) => result,
                Err(_) => Err(self.timed_out(DataSource::Countries, self.countries.endpoint())),
            }
        };
        let rates = async {
            match timeout_at(deadline, self.rates.fetch_rates()).await {
                Ok(result) => result,
                Err(_) => Err(self.timed_out(DataSource::ExchangeRates, self.rates.endpoint())),
            }
        };

        tokio::try_join!(countries, rates).map_err(|e| {
            error!("Refresh aborted: {}", e);
            e
        })
    }

    fn timed_out(&self, source: DataSource, endpoint: &str) -> CountryError {
        CountryError::source_unavailable(
            source,
            endpoint,
            format!("Request timed out after {}s", self.timeout.as_secs_f64()),
        )
    }

    /// Render on a detached task with its own store reads; failures stay in the log
    pub fn spawn_render(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let renderer = self.renderer.clone();
        let top_n = self.top_n;

        tokio::spawn(async move {
            match render_summary(store.as_ref(), renderer.as_ref(), top_n).await {
                Ok(path) => debug!("Summary image refreshed at {}", path.display()),
                Err(e) => error!("Summary image generation failed: {}", e),
            }
        })
    }
}

/// Collect the aggregate statistics and render them
pub async fn render_summary(
    store: &dyn CountryStore,
    renderer: &dyn SummaryRenderer,
    top_n: u32,
) -> Result<PathBuf> {
    let stats = SummaryStats {
        total_countries: store.count().await?,
        top_countries: store
            .top_by_gdp(top_n)
            .await?
            .into_iter()
            .map(|c| (c.name, c.estimated_gdp))
            .collect(),
        last_refreshed_at: store.most_recent_refresh().await?,
    };

    renderer.render(&stats).await
}
