//! Estimated GDP derivation

use rand::Rng;

/// Lower bound (inclusive) of the per-record GDP multiplier
pub const MULTIPLIER_MIN: f64 = 1000.0;
/// Upper bound (exclusive) of the per-record GDP multiplier
pub const MULTIPLIER_MAX: f64 = 2000.0;

/// Source of the per-record multiplier used in the GDP estimate
pub trait GdpMultiplier: Send + Sync {
    fn draw(&self) -> f64;
}

/// Fresh uniform draw in `[1000, 2000)` for every call
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMultiplier;

impl GdpMultiplier for RandomMultiplier {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(MULTIPLIER_MIN..MULTIPLIER_MAX)
    }
}

/// Always returns the same value; makes estimates reproducible
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl GdpMultiplier for FixedMultiplier {
    fn draw(&self) -> f64 {
        self.0
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `population × multiplier ÷ rate`, rounded to 2 decimal places.
///
/// Returns `None` when the rate is absent or zero. The multiplier is only
/// drawn when an estimate is actually produced.
pub fn estimate_gdp(
    population: i64,
    exchange_rate: Option<f64>,
    multiplier: &dyn GdpMultiplier,
) -> Option<f64> {
    let rate = exchange_rate?;
    if rate == 0.0 {
        return None;
    }

    let estimate = population as f64 * multiplier.draw() / rate;
    Some(round_to_cents(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(1.234), 1.23);
        assert_eq!(round_to_cents(1.235_1), 1.24);
        assert_eq!(round_to_cents(500_000.0), 500_000.0);
    }

    #[test]
    fn test_estimate_with_fixed_multiplier() {
        let gdp = estimate_gdp(1000, Some(2.0), &FixedMultiplier(1500.0));
        assert_eq!(gdp, Some(750_000.0));
    }

    #[test]
    fn test_absent_or_zero_rate_has_no_estimate() {
        assert_eq!(estimate_gdp(1000, None, &RandomMultiplier), None);
        assert_eq!(estimate_gdp(1000, Some(0.0), &RandomMultiplier), None);
    }

    #[test]
    fn test_random_estimate_stays_in_range() {
        let (population, rate) = (206_139_589_i64, 1_600.5_f64);
        let low = population as f64 * MULTIPLIER_MIN / rate;
        let high = population as f64 * MULTIPLIER_MAX / rate;

        for _ in 0..500 {
            let gdp = estimate_gdp(population, Some(rate), &RandomMultiplier).unwrap();
            // rounding may move the value by at most half a cent
            assert!(gdp >= low - 0.005 && gdp <= high + 0.005, "{gdp} out of range");
        }
    }

    #[test]
    fn test_random_multiplier_bounds() {
        for _ in 0..1000 {
            let m = RandomMultiplier.draw();
            assert!((MULTIPLIER_MIN..MULTIPLIER_MAX).contains(&m));
        }
    }
}
