//! Deterministic [`JsonFetcher`] for provider tests.

use crate::core::error::FetchError;
use crate::core::fetch::JsonFetcher;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, Result<Value, FetchError>>,
    call_count: AtomicUsize,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(mut self, url: &str, body: &str) -> Self {
        let value = serde_json::from_str(body).expect("stub body must be valid JSON");
        self.responses.insert(url.to_string(), Ok(value));
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        );
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.responses.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        })
    }
}
