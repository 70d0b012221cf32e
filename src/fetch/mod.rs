use std::sync::Arc;

use log::{debug, warn};
use reqwest::Client;
use tokio::sync::Semaphore;

use crate::config::{TlsPosture, UpstreamConfig};
use crate::error::{AppError, Context, Result};

pub mod decode;
pub mod request;

pub use decode::{ChartDocument, ChartResult, SearchDocument, SearchQuote};
pub use request::{prepare_chart_request, prepare_search_request, PreparedRequest};

pub type FetchResult<T> = Result<T>;

#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}

/// Single-attempt HTTP client for the market-data provider.
///
/// Cloning is cheap; clones share the connection pool and the in-flight cap.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    user_agent: String,
    permits: Arc<Semaphore>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> FetchResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if config.tls == TlsPosture::AcceptInvalidCerts {
            warn!(
                "Upstream certificate validation is disabled for {}",
                config.base_url
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .context("Failed to construct upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            permits: Arc::new(Semaphore::new(ensure_concurrency_limit(
                config.max_in_flight,
            ))),
        })
    }

    pub fn chart_request(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> FetchResult<PreparedRequest> {
        prepare_chart_request(&self.base_url, &self.user_agent, symbol, range, interval)
    }

    pub fn search_request(&self, query: &str) -> FetchResult<PreparedRequest> {
        prepare_search_request(&self.base_url, &self.user_agent, query)
    }

    /// Issues the request once and returns the raw body. Transport failures and
    /// non-2xx statuses both come back as [`AppError::Reqwest`], with the
    /// upstream URL stripped; it only goes to the log.
    pub async fn fetch(&self, request: &PreparedRequest) -> FetchResult<Vec<u8>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::message("Upstream client is shutting down"))?;

        debug!("GET {}", request.url);
        let body = self.send(request).await.map_err(|err| {
            debug!("GET {} failed: {err}", request.url);
            err.without_url()
        })?;
        Ok(body)
    }

    async fn send(&self, request: &PreparedRequest) -> reqwest::Result<Vec<u8>> {
        let response = self
            .client
            .get(&request.url)
            .headers(request.headers.clone())
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn concurrency_limit_is_at_least_one() {
        assert_eq!(ensure_concurrency_limit(0), 1);
        assert_eq!(ensure_concurrency_limit(8), 8);
    }

    #[test]
    fn builds_requests_against_configured_base() {
        let mut config = Config::builtin();
        config.upstream.base_url = "http://127.0.0.1:9".to_string();
        let client = UpstreamClient::new(&config.upstream).unwrap();

        let chart = client.chart_request("INFY.NS", "5d", "30m").unwrap();
        assert_eq!(
            chart.url,
            "http://127.0.0.1:9/v8/finance/chart/INFY.NS?range=5d&interval=30m"
        );

        let search = client.search_request("infy").unwrap();
        assert!(search.url.starts_with("http://127.0.0.1:9/v1/finance/search?q=infy"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let mut config = Config::builtin();
        config.upstream.base_url = "http://127.0.0.1:9".to_string();
        let client = UpstreamClient::new(&config.upstream).unwrap();

        let request = client.chart_request("TCS.NS", "1d", "1d").unwrap();
        let err = client.fetch(&request).await.unwrap_err();
        assert!(err.is_transport());
        assert!(!err.to_string().contains("127.0.0.1:9"));
        assert!(!err.to_string().contains("/v8/finance/chart"));
    }
}
