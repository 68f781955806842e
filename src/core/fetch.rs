//! Network capability abstraction

use crate::core::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

/// Fetches a JSON document from a URL.
///
/// Every provider receives one of these instead of talking to the network
/// directly, so lookups can be driven by deterministic stubs in tests.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}
