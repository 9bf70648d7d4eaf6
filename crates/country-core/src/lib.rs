//! Country Cache Core Library
//!
//! Domain types, port traits, and the enrichment rules that join country
//! directory entries with exchange rates.

pub mod enrich;
pub mod error;
pub mod gdp;
pub mod ports;
pub mod types;

pub use enrich::enrich_country;
pub use error::{CountryError, DataSource, Result};
pub use gdp::{estimate_gdp, round_to_cents, FixedMultiplier, GdpMultiplier, RandomMultiplier};
pub use types::*;
