//! HTTP clients for the country directory and exchange rate providers

use anyhow::Context;
use async_trait::async_trait;
use country_core::ports::{CountrySource, RateSource};
use country_core::{CountryError, DataSource, RateTable, RatesResponse, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct ExternalApiClient {
    http: reqwest::Client,
    countries_url: String,
    countries_host: String,
    rates_url: String,
    rates_host: String,
}

/// Host part of `url`, or the whole string if it does not parse
fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else {
        e.to_string()
    }
}

impl ExternalApiClient {
    pub fn new(countries_url: &str, rates_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("country-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            countries_url: countries_url.to_string(),
            countries_host: host_of(countries_url),
            rates_url: rates_url.to_string(),
            rates_host: host_of(rates_url),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        source: DataSource,
        host: &str,
    ) -> Result<T> {
        let unavailable = |e: reqwest::Error| CountryError::source_unavailable(source, host, describe(&e));

        debug!("Fetching {} from {}", source, url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?;

        response.json::<T>().await.map_err(unavailable)
    }
}

#[async_trait]
impl CountrySource for ExternalApiClient {
    fn endpoint(&self) -> &str {
        &self.countries_host
    }

    async fn fetch_countries(&self) -> Result<Vec<serde_json::Value>> {
        let entries: Vec<serde_json::Value> = self
            .get_json(&self.countries_url, DataSource::Countries, &self.countries_host)
            .await?;
        debug!("Country directory returned {} entries", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl RateSource for ExternalApiClient {
    fn endpoint(&self) -> &str {
        &self.rates_host
    }

    async fn fetch_rates(&self) -> Result<RateTable> {
        let response: RatesResponse = self
            .get_json(&self.rates_url, DataSource::ExchangeRates, &self.rates_host)
            .await?;

        if response.is_error() {
            return Err(CountryError::source_unavailable(
                DataSource::ExchangeRates,
                &self.rates_host,
                "provider reported an error result",
            ));
        }

        debug!(
            "Exchange rates returned {} currencies (base {})",
            response.rates.len(),
            response.base_code.as_deref().unwrap_or("unknown")
        );
        Ok(response.rates)
    }
}
