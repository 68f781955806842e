use crate::core::error::FetchError;
use crate::core::fetch::JsonFetcher;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("aurum/", env!("CARGO_PKG_VERSION"));

/// [`JsonFetcher`] over HTTP. One request per call, no retries.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    #[instrument(name = "HttpGet", skip(self))]
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_fetches_json() {
        let mock_server = create_mock_server(200, r#"{"price": "2000.5"}"#).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let value = fetcher
            .get_json(&format!("{}/doc", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(value["price"], "2000.5");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = create_mock_server(503, "").await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = format!("{}/doc", mock_server.uri());

        let err = fetcher.get_json(&url).await.unwrap_err();
        assert_eq!(err, FetchError::Status { url, status: 503 });
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = create_mock_server(200, "<html>").await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher
            .get_json(&format!("{}/doc", mock_server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().starts_with("Failed to parse JSON response from"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;
        let fetcher = HttpFetcher::new(Duration::from_millis(100)).unwrap();

        let err = fetcher
            .get_json(&format!("{}/slow", mock_server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
