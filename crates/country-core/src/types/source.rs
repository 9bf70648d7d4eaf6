//! Payload shapes returned by the external sources

use serde::Deserialize;
use std::collections::HashMap;

/// Currency code → rate relative to the provider's base currency
pub type RateTable = HashMap<String, f64>;

/// One entry of the country directory as the provider returns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capital: Option<Capital>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<RawCurrency>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrency {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Older directory versions send a string, newer ones a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Capital {
    One(String),
    Many(Vec<String>),
}

impl Capital {
    pub fn first(&self) -> Option<&str> {
        match self {
            Capital::One(s) => Some(s.as_str()),
            Capital::Many(list) => list.first().map(|s| s.as_str()),
        }
    }
}

/// Exchange rate provider response
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub rates: RateTable,
}

impl RatesResponse {
    pub fn is_error(&self) -> bool {
        self.result.as_deref() == Some("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_accepts_string_or_list() {
        let v2: RawCountry =
            serde_json::from_str(r#"{"name":"Ghana","capital":"Accra"}"#).unwrap();
        assert_eq!(v2.capital.as_ref().and_then(|c| c.first()), Some("Accra"));

        let v3: RawCountry =
            serde_json::from_str(r#"{"name":"Ghana","capital":["Accra"]}"#).unwrap();
        assert_eq!(v3.capital.as_ref().and_then(|c| c.first()), Some("Accra"));
    }

    #[test]
    fn test_rates_response_defaults() {
        let resp: RatesResponse = serde_json::from_str(r#"{"result":"success"}"#).unwrap();
        assert!(resp.rates.is_empty());
        assert!(!resp.is_error());

        let resp: RatesResponse =
            serde_json::from_str(r#"{"result":"error","error-type":"unknown-code"}"#).unwrap();
        assert!(resp.is_error());
    }
}
