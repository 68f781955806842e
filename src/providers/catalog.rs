use async_trait::async_trait;
use futures::future::join;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::currency::{CurrencyCatalog, CurrencyCode, CurrencyEntry, fallback_currencies};
use crate::core::error::LookupError;
use crate::core::fetch::JsonFetcher;
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;

/// Currency list built from a names catalog (lowercase code to display name)
/// and the codes the rate source supports.
///
/// Only supported codes are listed, so every entry is convertible. Codes the
/// names catalog does not know are listed under their own code.
pub struct CatalogProvider {
    names_url: String,
    fetcher: Arc<dyn JsonFetcher>,
    rates: Arc<ExchangeRateApiProvider>,
}

impl CatalogProvider {
    pub fn new(
        names_url: &str,
        fetcher: Arc<dyn JsonFetcher>,
        rates: Arc<ExchangeRateApiProvider>,
    ) -> Self {
        CatalogProvider {
            names_url: names_url.to_string(),
            fetcher,
            rates,
        }
    }

    async fn fetch_names(&self) -> Result<HashMap<String, String>, LookupError> {
        let value = self.fetcher.get_json(&self.names_url).await?;
        let Value::Object(map) = value else {
            return Err(LookupError::Payload(
                "Currency names catalog is not an object".to_string(),
            ));
        };

        // Non-string names are skipped rather than failing the whole catalog
        Ok(map
            .into_iter()
            .filter_map(|(code, name)| match name {
                Value::String(name) => Some((code.to_lowercase(), name)),
                _ => None,
            })
            .collect())
    }

    async fn try_list(&self) -> Result<Vec<CurrencyEntry>, LookupError> {
        let (names, codes) = join(self.fetch_names(), self.rates.supported_codes()).await;
        let (names, codes) = (names?, codes?);
        Ok(merge_catalog(&names, &codes))
    }
}

/// Names every supported code, drops blank names, sorts by code and removes
/// duplicates.
fn merge_catalog(names: &HashMap<String, String>, codes: &[String]) -> Vec<CurrencyEntry> {
    let entries: BTreeMap<CurrencyCode, String> = codes
        .iter()
        .map(|code| {
            let code = CurrencyCode::new(code);
            let name = names
                .get(&code.as_str().to_lowercase())
                .cloned()
                .unwrap_or_else(|| code.to_string());
            (code, name)
        })
        .filter(|(code, name)| !code.as_str().is_empty() && !name.trim().is_empty())
        .collect();

    entries
        .into_iter()
        .map(|(code, name)| CurrencyEntry { code, name })
        .collect()
}

#[async_trait]
impl CurrencyCatalog for CatalogProvider {
    #[instrument(name = "CurrencyCatalogFetch", skip(self))]
    async fn list_currencies(&self) -> Vec<CurrencyEntry> {
        match self.try_list().await {
            Ok(entries) if !entries.is_empty() => {
                debug!("Loaded {} currencies", entries.len());
                entries
            }
            Ok(_) => {
                warn!("Currency catalog was empty, using fallback list");
                fallback_currencies()
            }
            Err(e) => {
                warn!(error = %e, "Error fetching currencies, using fallback list");
                fallback_currencies()
            }
        }
    }
}
