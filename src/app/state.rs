use crate::config::UpstreamConfig;
use crate::error::Result;
use crate::fetch::UpstreamClient;

/// Per-router state. Holds nothing request-specific.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(config)?,
        })
    }
}
