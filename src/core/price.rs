//! Gold pricing abstractions

use crate::core::error::LookupError;
use async_trait::async_trait;

#[async_trait]
pub trait GoldPriceProvider: Send + Sync {
    /// USD price of one troy ounce of gold.
    async fn fetch_spot_price(&self) -> Result<f64, LookupError>;
}
