//! Error types shared by the providers and the conversion controller.

use std::fmt::Display;
use thiserror::Error;

/// Failures of the "fetch JSON from URL" capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Request error: {message} for URL: {url}")]
    Transport { url: String, message: String },

    #[error("HTTP error: {status} for URL: {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse JSON response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// A rate or price lookup that could not produce a usable number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The upstream payload flagged an error, e.g. `unsupported-code`.
    #[error("{0}")]
    Upstream(String),

    /// A code that is not three ASCII letters; rejected before any request.
    #[error("Invalid currency: {0}")]
    InvalidCode(String),

    #[error("No rate for {to} in the {from} rate table")]
    MissingRate { from: String, to: String },

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Invalid gold price: {0}")]
    InvalidPrice(String),

    #[error("Unexpected payload: {0}")]
    Payload(String),
}

/// Rejections of the raw amount input, detected before any network access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter an amount.")]
    Empty,

    #[error("Please enter a valid amount greater than zero ('{0}' is not a number).")]
    NotANumber(String),

    #[error("Please enter a valid amount greater than zero ('{0}' is not finite).")]
    NotFinite(String),

    #[error("Please enter a valid amount greater than zero.")]
    NotPositive,
}

/// The two sequential steps of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Conversion,
    Gold,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Stage::Conversion => "conversion",
                Stage::Gold => "gold",
            }
        )
    }
}

/// User-facing error of a stage, kept by the controller until the next
/// attempt or input change.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} failed: {message}")]
pub struct PipelineError {
    pub stage: Stage,
    pub message: String,
}

impl PipelineError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_is_transparent_over_fetch_error() {
        let err = LookupError::from(FetchError::Status {
            url: "http://localhost/latest/EUR".to_string(),
            status: 500,
        });
        assert_eq!(
            err.to_string(),
            "HTTP error: 500 for URL: http://localhost/latest/EUR"
        );
    }

    #[test]
    fn test_pipeline_error_display_names_stage() {
        let err = PipelineError::new(Stage::Gold, "Invalid gold price: abc");
        assert_eq!(err.to_string(), "gold failed: Invalid gold price: abc");
        assert_eq!(err.message, "Invalid gold price: abc");
    }
}
