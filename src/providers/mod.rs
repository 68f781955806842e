pub mod binance;
pub mod catalog;
pub mod exchange_rate_api;
pub mod http;

#[cfg(test)]
pub(crate) mod stub;
