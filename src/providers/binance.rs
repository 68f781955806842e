use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::error::LookupError;
use crate::core::fetch::JsonFetcher;
use crate::core::price::GoldPriceProvider;

/// Spot price of a gold-backed token (PAXG by default) from a Binance
/// compatible ticker endpoint. One token is backed by one troy ounce.
pub struct BinanceGoldProvider {
    base_url: String,
    symbol: String,
    fetcher: Arc<dyn JsonFetcher>,
}

#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    price: String,
}

impl BinanceGoldProvider {
    pub fn new(base_url: &str, symbol: &str, fetcher: Arc<dyn JsonFetcher>) -> Self {
        BinanceGoldProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            symbol: symbol.to_string(),
            fetcher,
        }
    }
}

#[async_trait]
impl GoldPriceProvider for BinanceGoldProvider {
    #[instrument(name = "GoldPriceFetch", skip(self), fields(symbol = %self.symbol))]
    async fn fetch_spot_price(&self) -> Result<f64, LookupError> {
        let url = format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.base_url, self.symbol
        );
        let value = self.fetcher.get_json(&url).await?;

        let data: TickerPriceResponse = serde_json::from_value(value).map_err(|e| {
            LookupError::Payload(format!("Failed to parse ticker for {}: {e}", self.symbol))
        })?;

        let price: f64 = data
            .price
            .trim()
            .parse()
            .map_err(|_| LookupError::InvalidPrice(data.price.clone()))?;
        if !price.is_finite() || price <= 0.0 {
            return Err(LookupError::InvalidPrice(data.price));
        }

        debug!(price, "Received gold spot price");
        Ok(price)
    }
}
