//! Service configuration
//!
//! Defaults, then an optional `countrycache.toml` in the working directory,
//! then environment variables (`DATABASE_URL`, `API_TIMEOUT`, ...).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RESTCOUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app_name: String,
    pub environment: String,
    pub api_host: String,
    pub api_port: u16,
    pub database_url: String,
    pub cache_dir: PathBuf,
    pub restcountries_api_url: String,
    pub exchange_rate_api_url: String,
    /// Shared budget for both source fetches, in seconds
    pub api_timeout: u64,
    pub allowed_origins: Vec<String>,
    pub summary_top_n: u32,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app_name", "Country Currency API")?
            .set_default("environment", "development")?
            .set_default("api_host", "0.0.0.0")?
            .set_default("api_port", 8000_i64)?
            .set_default("database_url", "sqlite://data/countries.db")?
            .set_default("cache_dir", "cache")?
            .set_default("restcountries_api_url", DEFAULT_RESTCOUNTRIES_URL)?
            .set_default("exchange_rate_api_url", DEFAULT_EXCHANGE_RATE_URL)?
            .set_default("api_timeout", 30_i64)?
            .set_default("allowed_origins", vec!["*"])?
            .set_default("summary_top_n", 5_i64)?
            .set_default("log_format", "pretty")?
            .add_source(File::with_name("countrycache").required(false))
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}

#[cfg(test)]
pub(crate) fn test_settings(vars: &[(&str, &str)]) -> Settings {
    let map = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_environment(Environment::default().source(Some(map)))
        .expect("test settings should load")
}
