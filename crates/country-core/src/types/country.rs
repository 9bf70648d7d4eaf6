//! Country types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized uniqueness key for a country name
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Country data produced by a refresh, ready to be upserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

impl NewCountry {
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

/// A stored country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Optional list filters, matched case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryFilter {
    pub region: Option<String>,
    pub currency: Option<String>,
}

impl CountryFilter {
    /// Drops blank values so `?region=` behaves like no filter
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            region: clean(self.region),
            currency: clean(self.currency),
        }
    }
}

/// List ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountrySort {
    GdpDesc,
    GdpAsc,
    #[default]
    NameAsc,
    NameDesc,
    PopulationDesc,
    PopulationAsc,
}

impl CountrySort {
    /// Parse a sort key; unknown or missing keys fall back to `name_asc`
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("gdp_desc") => CountrySort::GdpDesc,
            Some("gdp_asc") => CountrySort::GdpAsc,
            Some("name_desc") => CountrySort::NameDesc,
            Some("population_desc") => CountrySort::PopulationDesc,
            Some("population_asc") => CountrySort::PopulationAsc,
            _ => CountrySort::NameAsc,
        }
    }
}

impl std::fmt::Display for CountrySort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountrySort::GdpDesc => write!(f, "gdp_desc"),
            CountrySort::GdpAsc => write!(f, "gdp_asc"),
            CountrySort::NameAsc => write!(f, "name_asc"),
            CountrySort::NameDesc => write!(f, "name_desc"),
            CountrySort::PopulationDesc => write!(f, "population_desc"),
            CountrySort::PopulationAsc => write!(f, "population_asc"),
        }
    }
}
