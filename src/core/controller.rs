//! State machine behind the converter surface.
//!
//! The [`Converter`] owns the user's input, the two derived results and the
//! per-stage loading flags. Each stage is split into a `begin_*` call that
//! validates and marks the stage in flight, and a `complete_*` call that
//! applies the lookup outcome. Every input change bumps a generation counter
//! so that completions of superseded attempts are dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::core::conversion::{ConversionResult, GoldResult};
use crate::core::currency::{CurrencyCode, CurrencyRateProvider, USD};
use crate::core::error::{LookupError, PipelineError, Stage, ValidationError};
use crate::core::price::GoldPriceProvider;

/// Phase of the converter, named by what is currently populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InputPending,
    ConversionInFlight,
    Converted,
    GoldInFlight,
    Complete,
    Failed(Stage),
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConverterEvent {
    Converted(ConversionResult),
    /// Entered [`Phase::Complete`]; the cue for the celebration.
    GoldComputed(GoldResult),
    Failed(PipelineError),
}

/// Why an action was refused without changing any state beyond what the
/// variant documents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("A {0} lookup is already in progress")]
    Busy(Stage),

    #[error("Convert an amount to USD first")]
    NotConverted,

    /// The converter moved to `Failed(Conversion)` with this message.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    generation: u64,
    pub amount: f64,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldRequest {
    generation: u64,
    pub usd_amount: f64,
}

/// Parses the raw amount input. Only finite values strictly above zero are
/// convertible.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive);
    }
    Ok(value)
}

const EVENT_CAPACITY: usize = 16;

const AMOUNT_TOO_LARGE: &str = "The amount is too large to convert.";

pub struct Converter {
    rates: Arc<dyn CurrencyRateProvider>,
    gold_prices: Arc<dyn GoldPriceProvider>,
    amount: String,
    currency: CurrencyCode,
    conversion: Option<ConversionResult>,
    gold: Option<GoldResult>,
    error: Option<PipelineError>,
    phase: Phase,
    converting: bool,
    fetching_gold: bool,
    generation: u64,
    events: broadcast::Sender<ConverterEvent>,
}

impl Converter {
    pub fn new(
        rates: Arc<dyn CurrencyRateProvider>,
        gold_prices: Arc<dyn GoldPriceProvider>,
        currency: &str,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            rates,
            gold_prices,
            amount: String::new(),
            currency: CurrencyCode::new(currency),
            conversion: None,
            gold: None,
            error: None,
            phase: Phase::Idle,
            converting: false,
            fetching_gold: false,
            generation: 0,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConverterEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn conversion(&self) -> Option<&ConversionResult> {
        self.conversion.as_ref()
    }

    pub fn gold(&self) -> Option<&GoldResult> {
        self.gold.as_ref()
    }

    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    pub fn is_converting(&self) -> bool {
        self.converting
    }

    pub fn is_fetching_gold(&self) -> bool {
        self.fetching_gold
    }

    /// Mirrors the enabled state of the "convert" action.
    pub fn can_convert(&self) -> bool {
        !self.converting && !self.amount.trim().is_empty()
    }

    /// Mirrors the enabled state of the "calculate gold" action.
    pub fn can_calculate_gold(&self) -> bool {
        !self.fetching_gold && self.conversion.is_some()
    }

    pub fn has_results(&self) -> bool {
        self.conversion.is_some() || self.gold.is_some()
    }

    pub fn set_amount(&mut self, raw: impl Into<String>) {
        self.amount = raw.into();
        self.invalidate();
    }

    pub fn set_currency(&mut self, code: impl AsRef<str>) {
        self.currency = CurrencyCode::new(code);
        self.invalidate();
    }

    /// Clears the amount and every derived value; the currency selection is
    /// kept.
    pub fn reset(&mut self) {
        debug!("Resetting converter");
        self.amount.clear();
        self.clear_derived();
        self.phase = Phase::Idle;
    }

    fn invalidate(&mut self) {
        self.clear_derived();
        self.phase = Phase::InputPending;
    }

    fn clear_derived(&mut self) {
        self.generation += 1;
        self.conversion = None;
        self.gold = None;
        self.error = None;
        self.converting = false;
        self.fetching_gold = false;
    }

    fn fail(&mut self, error: PipelineError) {
        warn!(stage = %error.stage, message = %error.message, "Stage failed");
        self.phase = Phase::Failed(error.stage);
        self.error = Some(error.clone());
        let _ = self.events.send(ConverterEvent::Failed(error));
    }

    pub fn begin_conversion(&mut self) -> Result<ConversionRequest, ActionError> {
        if self.converting {
            return Err(ActionError::Busy(Stage::Conversion));
        }
        let amount = match parse_amount(&self.amount) {
            Ok(amount) => amount,
            Err(e) => {
                self.fail(PipelineError::new(Stage::Conversion, e.to_string()));
                return Err(e.into());
            }
        };

        self.clear_derived();
        self.converting = true;
        self.phase = Phase::ConversionInFlight;
        debug!(amount, currency = %self.currency, "Conversion started");

        Ok(ConversionRequest {
            generation: self.generation,
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Applies the rate lookup outcome. Returns `false` when the request was
    /// superseded by an input change or reset and the outcome was dropped.
    pub fn complete_conversion(
        &mut self,
        request: ConversionRequest,
        outcome: Result<f64, LookupError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!("Dropping stale conversion outcome");
            return false;
        }
        self.converting = false;

        let rate = match outcome {
            Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
            Ok(rate) => {
                let e = LookupError::InvalidRate(rate.to_string());
                self.fail(PipelineError::new(Stage::Conversion, e.to_string()));
                return true;
            }
            Err(e) => {
                self.fail(PipelineError::new(Stage::Conversion, e.to_string()));
                return true;
            }
        };

        let result = ConversionResult::new(request.amount, request.currency, rate);
        if !result.usd_amount.is_finite() {
            self.fail(PipelineError::new(Stage::Conversion, AMOUNT_TOO_LARGE));
            return true;
        }
        info!(usd_amount = result.usd_amount, rate, "Converted to USD");
        self.conversion = Some(result.clone());
        self.phase = Phase::Converted;
        let _ = self.events.send(ConverterEvent::Converted(result));
        true
    }

    pub fn begin_gold(&mut self) -> Result<GoldRequest, ActionError> {
        if self.fetching_gold {
            return Err(ActionError::Busy(Stage::Gold));
        }
        let usd_amount = self
            .conversion
            .as_ref()
            .map(|c| c.usd_amount)
            .ok_or(ActionError::NotConverted)?;

        self.error = None;
        self.gold = None;
        self.fetching_gold = true;
        self.phase = Phase::GoldInFlight;
        debug!(usd_amount, "Gold calculation started");

        Ok(GoldRequest {
            generation: self.generation,
            usd_amount,
        })
    }

    /// Applies the gold price outcome. A failure keeps the USD result so the
    /// gold stage can be retried on its own.
    pub fn complete_gold(
        &mut self,
        request: GoldRequest,
        outcome: Result<f64, LookupError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!("Dropping stale gold outcome");
            return false;
        }
        self.fetching_gold = false;

        match outcome {
            Ok(price) if price.is_finite() && price > 0.0 => {
                let result = GoldResult::new(request.usd_amount, price);
                info!(grams = result.grams, price, "Gold weight computed");
                self.gold = Some(result.clone());
                self.phase = Phase::Complete;
                let _ = self.events.send(ConverterEvent::GoldComputed(result));
            }
            Ok(price) => self.fail(PipelineError::new(
                Stage::Gold,
                LookupError::InvalidPrice(price.to_string()).to_string(),
            )),
            Err(e) => self.fail(PipelineError::new(Stage::Gold, e.to_string())),
        }
        true
    }

    /// Runs stage 1 against the rate provider.
    #[instrument(name = "Convert", skip(self), fields(currency = %self.currency))]
    pub async fn convert(&mut self) -> Result<ConversionResult, PipelineError> {
        let request = self
            .begin_conversion()
            .map_err(|e| self.action_error(Stage::Conversion, e))?;
        let outcome = self.rates.get_rate(request.currency.as_str(), USD).await;
        self.complete_conversion(request, outcome);
        self.settled(Stage::Conversion, |c| c.conversion.clone())
    }

    /// Runs stage 2 against the gold price provider.
    #[instrument(name = "CalculateGold", skip(self))]
    pub async fn calculate_gold(&mut self) -> Result<GoldResult, PipelineError> {
        let request = self
            .begin_gold()
            .map_err(|e| self.action_error(Stage::Gold, e))?;
        let outcome = self.gold_prices.fetch_spot_price().await;
        self.complete_gold(request, outcome);
        self.settled(Stage::Gold, |c| c.gold.clone())
    }

    fn action_error(&self, stage: Stage, e: ActionError) -> PipelineError {
        match (&e, &self.error) {
            (ActionError::Invalid(_), Some(recorded)) => recorded.clone(),
            _ => PipelineError::new(stage, e.to_string()),
        }
    }

    fn settled<T>(
        &self,
        stage: Stage,
        result: impl Fn(&Self) -> Option<T>,
    ) -> Result<T, PipelineError> {
        match (&self.error, result(self)) {
            (Some(e), _) => Err(e.clone()),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(PipelineError::new(stage, "Result was discarded")),
        }
    }
}
