//! Joins a directory entry with the rate table

use crate::error::{CountryError, Result};
use crate::gdp::{estimate_gdp, GdpMultiplier};
use crate::types::{NewCountry, RateTable, RawCountry};

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Currency code of the first listed currency, if it has one
pub fn first_currency_code(raw: &RawCountry) -> Option<String> {
    let first = raw.currencies.as_ref()?.first()?;
    non_blank(first.code.as_deref())
}

/// Rate for `code`; negative or non-finite rates are treated as missing
pub fn lookup_rate(code: Option<&str>, rates: &RateTable) -> Option<f64> {
    let rate = *rates.get(code?)?;
    (rate.is_finite() && rate >= 0.0).then_some(rate)
}

/// Build a storage-ready country from one raw directory entry.
///
/// Fails with [`CountryError::RecordProcessing`] when the entry cannot be
/// decoded, has no name, or reports a negative population.
pub fn enrich_country(
    entry: serde_json::Value,
    rates: &RateTable,
    multiplier: &dyn GdpMultiplier,
) -> Result<NewCountry> {
    let label = entry
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("<unnamed>")
        .to_string();

    let raw: RawCountry =
        serde_json::from_value(entry).map_err(|e| CountryError::record(label.clone(), e))?;

    let name = non_blank(raw.name.as_deref())
        .ok_or_else(|| CountryError::record(label.clone(), "name is required"))?;

    let population = raw.population.unwrap_or(0);
    if population < 0 {
        return Err(CountryError::record(
            name,
            format!("population must be non-negative, got {}", population),
        ));
    }

    let currency_code = first_currency_code(&raw);
    let exchange_rate = lookup_rate(currency_code.as_deref(), rates);
    let estimated_gdp = estimate_gdp(population, exchange_rate, multiplier);

    Ok(NewCountry {
        name,
        capital: non_blank(raw.capital.as_ref().and_then(|c| c.first())),
        region: non_blank(raw.region.as_deref()),
        population,
        currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: non_blank(raw.flag.as_deref()),
    })
}
