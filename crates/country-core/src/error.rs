//! Error types for Country Cache

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CountryError>;

/// External provider a refresh depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Countries,
    ExchangeRates,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Countries => write!(f, "country directory"),
            DataSource::ExchangeRates => write!(f, "exchange rates"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CountryError {
    #[error("Could not fetch data from {endpoint} - {cause}")]
    SourceUnavailable {
        provider: DataSource,
        endpoint: String,
        cause: String,
    },

    #[error("Skipping record {record}: {cause}")]
    RecordProcessing { record: String, cause: String },

    #[error("Country not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CountryError {
    pub fn source_unavailable(
        provider: DataSource,
        endpoint: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        CountryError::SourceUnavailable {
            provider,
            endpoint: endpoint.into(),
            cause: cause.to_string(),
        }
    }

    pub fn record(record: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        CountryError::RecordProcessing {
            record: record.into(),
            cause: cause.to_string(),
        }
    }

    /// Short "could not fetch" line without the underlying cause
    pub fn source_details(&self) -> Option<String> {
        match self {
            CountryError::SourceUnavailable { endpoint, .. } => {
                Some(format!("Could not fetch data from {}", endpoint))
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CountryError {
    fn from(e: serde_json::Error) -> Self {
        CountryError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_message() {
        let err = CountryError::source_unavailable(
            DataSource::Countries,
            "restcountries.com",
            "Request timed out",
        );
        assert_eq!(
            err.to_string(),
            "Could not fetch data from restcountries.com - Request timed out"
        );
        assert_eq!(
            err.source_details().as_deref(),
            Some("Could not fetch data from restcountries.com")
        );
    }

    #[test]
    fn test_data_source_serializes_snake_case() {
        let json = serde_json::to_string(&DataSource::ExchangeRates).unwrap();
        assert_eq!(json, "\"exchange_rates\"");
    }
}
