//! Pure arithmetic of the two conversion stages.
//!
//! Rates and prices are fetched elsewhere and passed in, so nothing here
//! performs I/O. Callers guarantee a finite `amount > 0` for [`to_usd`] and a
//! `price_per_troy_ounce > 0` for [`to_gold_grams`].

use chrono::{DateTime, Utc};

use crate::core::currency::CurrencyCode;

/// Grams in one international troy ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;

/// Stage 1: `amount` of a currency to USD at `rate` USD per unit.
pub fn to_usd(amount: f64, rate: f64) -> f64 {
    amount * rate
}

pub fn price_per_gram(price_per_troy_ounce: f64) -> f64 {
    price_per_troy_ounce / GRAMS_PER_TROY_OUNCE
}

/// Stage 2: weight of gold in grams that `usd_amount` buys.
pub fn to_gold_grams(usd_amount: f64, price_per_troy_ounce: f64) -> f64 {
    usd_amount * GRAMS_PER_TROY_OUNCE / price_per_troy_ounce
}

/// Outcome of a successful stage 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub currency: CurrencyCode,
    pub rate: f64,
    pub usd_amount: f64,
    pub computed_at: DateTime<Utc>,
}

impl ConversionResult {
    pub fn new(amount: f64, currency: CurrencyCode, rate: f64) -> Self {
        Self {
            amount,
            currency,
            rate,
            usd_amount: to_usd(amount, rate),
            computed_at: Utc::now(),
        }
    }
}

/// Outcome of a successful stage 2.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldResult {
    pub grams: f64,
    pub price_per_troy_ounce: f64,
    pub price_per_gram: f64,
    pub computed_at: DateTime<Utc>,
}

impl GoldResult {
    pub fn new(usd_amount: f64, price_per_troy_ounce: f64) -> Self {
        Self {
            grams: to_gold_grams(usd_amount, price_per_troy_ounce),
            price_per_troy_ounce,
            price_per_gram: price_per_gram(price_per_troy_ounce),
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
    }

    #[test]
    fn test_eur_to_gold_scenario() {
        let usd = to_usd(100.0, 1.10);
        assert!((usd - 110.0).abs() < 1e-9);

        let per_gram = price_per_gram(2000.0);
        assert!((per_gram - 64.3015).abs() < 1e-4);

        let grams = to_gold_grams(usd, 2000.0);
        assert!((grams - 1.710691).abs() < 1e-6);
    }

    #[test]
    fn test_one_ounce_of_usd_buys_one_ounce() {
        assert!(close(to_gold_grams(2500.0, 2500.0), GRAMS_PER_TROY_OUNCE));
    }

    #[test]
    fn test_results_carry_derived_values() {
        let conversion = ConversionResult::new(100.0, CurrencyCode::new("eur"), 1.1);
        assert_eq!(conversion.currency.as_str(), "EUR");
        assert!(close(conversion.usd_amount, 110.0));

        let gold = GoldResult::new(conversion.usd_amount, 2000.0);
        assert!(close(gold.price_per_gram, 2000.0 / GRAMS_PER_TROY_OUNCE));
        assert!(close(gold.grams, conversion.usd_amount / gold.price_per_gram));
    }

    proptest! {
        #[test]
        fn to_usd_is_linear(a in 0.01f64..1e9, r in 1e-6f64..1e4) {
            prop_assert!(close(to_usd(2.0 * a, r), 2.0 * to_usd(a, r)));
            prop_assert!(close(to_usd(a, 2.0 * r), 2.0 * to_usd(a, r)));
        }

        #[test]
        fn gold_grams_decrease_with_price(
            usd in 0.01f64..1e9,
            price in 1.0f64..1e5,
            bump in 0.01f64..1e4,
        ) {
            prop_assert!(to_gold_grams(usd, price + bump) < to_gold_grams(usd, price));
        }

        #[test]
        fn stages_compose(a in 0.01f64..1e9, r in 1e-6f64..1e4, p in 1.0f64..1e5) {
            let grams = to_gold_grams(to_usd(a, r), p);
            prop_assert!(close(grams, a * r * GRAMS_PER_TROY_OUNCE / p));
        }
    }
}
