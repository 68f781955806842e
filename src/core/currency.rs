//! Currency abstractions

use crate::core::error::LookupError;
use async_trait::async_trait;
use std::fmt::Display;

/// Currency every conversion is routed through.
pub const USD: &str = "USD";

/// Short uppercase currency identifier, e.g. `EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        CurrencyCode(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Three ASCII letters, the ISO 4217 shape.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyEntry {
    pub code: CurrencyCode,
    pub name: String,
}

impl CurrencyEntry {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: CurrencyCode::new(code),
            name: name.to_string(),
        }
    }
}

const FALLBACK: [(&str, &str); 11] = [
    ("USD", "United States Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("INR", "Indian Rupee"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("JPY", "Japanese Yen"),
    ("CNY", "Chinese Yuan"),
    ("AED", "UAE Dirham"),
    ("SAR", "Saudi Riyal"),
    ("PKR", "Pakistani Rupee"),
];

/// Well-known currencies used when the catalog cannot be fetched, sorted by
/// code.
pub fn fallback_currencies() -> Vec<CurrencyEntry> {
    let mut entries: Vec<CurrencyEntry> = FALLBACK
        .iter()
        .map(|(code, name)| CurrencyEntry::new(code, name))
        .collect();
    entries.sort_by(|a, b| a.code.cmp(&b.code));
    entries
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, LookupError>;
}

/// Source of the selectable currencies. Never fails: implementations degrade
/// to [`fallback_currencies`].
#[async_trait]
pub trait CurrencyCatalog: Send + Sync {
    async fn list_currencies(&self) -> Vec<CurrencyEntry>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_is_normalized() {
        assert_eq!(CurrencyCode::new(" eur ").as_str(), "EUR");
        assert_eq!(CurrencyCode::new("usd"), CurrencyCode::new("USD"));
    }

    #[test]
    fn test_well_formed_codes() {
        assert!(CurrencyCode::new("eur").is_well_formed());
        assert!(CurrencyCode::new(" XAU ").is_well_formed());
        assert!(!CurrencyCode::new("JPY/../USD").is_well_formed());
        assert!(!CurrencyCode::new("US").is_well_formed());
        assert!(!CurrencyCode::new("EURO").is_well_formed());
        assert!(!CurrencyCode::new("E1R").is_well_formed());
        assert!(!CurrencyCode::new("").is_well_formed());
        assert!(!CurrencyCode::new("ÉUR").is_well_formed());
    }

    #[test]
    fn test_fallback_currencies_sorted_and_unique() {
        let list = fallback_currencies();
        assert_eq!(list.len(), 11);
        let codes: Vec<&str> = list.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "AED", "AUD", "CAD", "CNY", "EUR", "GBP", "INR", "JPY", "PKR", "SAR", "USD"
            ]
        );
        assert_eq!(list[0].name, "UAE Dirham");
    }
}
