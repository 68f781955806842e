//! Core business logic abstractions

pub mod config;
pub mod controller;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod fetch;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use controller::{Converter, ConverterEvent, Phase};
pub use conversion::{ConversionResult, GoldResult, GRAMS_PER_TROY_OUNCE};
pub use currency::{CurrencyCatalog, CurrencyCode, CurrencyEntry, CurrencyRateProvider};
pub use error::{FetchError, LookupError, PipelineError, Stage, ValidationError};
pub use fetch::JsonFetcher;
pub use price::GoldPriceProvider;
