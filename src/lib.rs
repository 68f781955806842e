pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Converter, JsonFetcher};
use crate::providers::{
    binance::BinanceGoldProvider, catalog::CatalogProvider,
    exchange_rate_api::ExchangeRateApiProvider, http::HttpFetcher,
};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: String,
        currency: Option<String>,
        usd_only: bool,
    },
    Currencies,
    Interactive,
}

/// Providers wired to the configured endpoints.
pub struct Services {
    pub rates: Arc<ExchangeRateApiProvider>,
    pub gold: Arc<BinanceGoldProvider>,
    pub catalog: CatalogProvider,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(
            config.request_timeout_secs,
        ))?);

        let rates = Arc::new(ExchangeRateApiProvider::new(
            config.exchange_rate_url(),
            Arc::clone(&fetcher),
        ));
        let gold = Arc::new(BinanceGoldProvider::new(
            config.gold_url(),
            config.gold_symbol(),
            Arc::clone(&fetcher),
        ));
        let catalog = CatalogProvider::new(
            config.currency_names_url(),
            Arc::clone(&fetcher),
            Arc::clone(&rates),
        );

        Ok(Services {
            rates,
            gold,
            catalog,
        })
    }

    pub fn converter(&self, currency: &str) -> Converter {
        Converter::new(self.rates.clone(), self.gold.clone(), currency)
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency to gold converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let services = Services::from_config(&config)?;
    let mut converter = services.converter(&config.currency);

    match command {
        AppCommand::Convert {
            amount,
            currency,
            usd_only,
        } => cli::convert::run(&mut converter, &amount, currency.as_deref(), usd_only).await,
        AppCommand::Currencies => cli::currencies::run(&services.catalog).await,
        AppCommand::Interactive => cli::interactive::run(&mut converter, &services.catalog).await,
    }
}
