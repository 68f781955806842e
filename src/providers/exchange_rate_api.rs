use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::currency::{CurrencyCode, CurrencyRateProvider, USD};
use crate::core::error::LookupError;
use crate::core::fetch::JsonFetcher;

/// Reason reported when the upstream flags an error without naming it.
const GENERIC_UPSTREAM_ERROR: &str = "Invalid currency";

/// Rate tables from an open.er-api.com compatible endpoint,
/// `{base_url}/latest/{CODE}`.
pub struct ExchangeRateApiProvider {
    base_url: String,
    fetcher: Arc<dyn JsonFetcher>,
}

#[derive(Debug, Deserialize)]
struct RateTableResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, fetcher: Arc<dyn JsonFetcher>) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    async fn fetch_table(
        &self,
        base: &CurrencyCode,
    ) -> Result<HashMap<String, f64>, LookupError> {
        let url = format!("{}/latest/{}", self.base_url, base);
        let value = self.fetcher.get_json(&url).await?;

        let data: RateTableResponse = serde_json::from_value(value).map_err(|e| {
            LookupError::Payload(format!("Failed to parse rate table for {base}: {e}"))
        })?;

        if data.result.as_deref() == Some("error") {
            let reason = data
                .error_type
                .filter(|reason| !reason.trim().is_empty())
                .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string());
            return Err(LookupError::Upstream(reason));
        }

        Ok(data.rates)
    }

    /// Codes the rate source can convert, taken from the USD rate table.
    #[instrument(name = "SupportedCodes", skip(self))]
    pub async fn supported_codes(&self) -> Result<Vec<String>, LookupError> {
        let table = self.fetch_table(&CurrencyCode::new(USD)).await?;
        let mut codes: Vec<String> = table.into_keys().collect();
        codes.sort();
        debug!("Rate source supports {} codes", codes.len());
        Ok(codes)
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, LookupError> {
        let from = CurrencyCode::new(from);
        let to = CurrencyCode::new(to);
        for code in [&from, &to] {
            if !code.is_well_formed() {
                return Err(LookupError::InvalidCode(code.to_string()));
            }
        }
        if from == to {
            return Ok(1.0);
        }

        let table = self.fetch_table(&from).await?;
        let rate = table
            .get(to.as_str())
            .copied()
            .ok_or_else(|| LookupError::MissingRate {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(LookupError::InvalidRate(rate.to_string()));
        }

        debug!(rate, "Received exchange rate");
        Ok(rate)
    }
}
