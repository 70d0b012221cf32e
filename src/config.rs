use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8008;
pub const UPSTREAM_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Yahoo rejects requests carrying a default library user agent.
pub const UPSTREAM_USER_AGENT: &str = "Mozilla/5.0";
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const UPSTREAM_MAX_IN_FLIGHT: usize = 32;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every path outside `/api`.
    pub static_root: PathBuf,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Certificate handling for the outbound connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPosture {
    Verify,
    /// Skips certificate chain validation. Only for hosts behind intercepting proxies.
    AcceptInvalidCerts,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_in_flight: usize,
    pub tls: TlsPosture,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

impl Config {
    pub fn builtin() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                static_root: PathBuf::from("."),
            },
            upstream: UpstreamConfig {
                base_url: UPSTREAM_BASE_URL.to_string(),
                user_agent: UPSTREAM_USER_AGENT.to_string(),
                timeout: UPSTREAM_TIMEOUT,
                max_in_flight: UPSTREAM_MAX_IN_FLIGHT,
                tls: TlsPosture::Verify,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.upstream.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AppError::message(format!(
                "Upstream base URL must be http(s): {}",
                self.upstream.base_url
            )));
        }
        if base.ends_with('/') {
            return Err(AppError::message(
                "Upstream base URL must not end with a trailing slash",
            ));
        }
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::message("Upstream user agent must not be empty"));
        }
        if self.upstream.timeout.is_zero() {
            return Err(AppError::message("Upstream timeout must be non-zero"));
        }
        if self.server.host.trim().is_empty() {
            return Err(AppError::message("Server host must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_listens_on_fixed_port() {
        let config = Config::builtin();
        assert_eq!(config.server.port, 8008);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8008");
        assert_eq!(config.upstream.tls, TlsPosture::Verify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_trailing_slash_in_base_url() {
        let mut config = Config::builtin();
        config.upstream.base_url = "https://query1.finance.yahoo.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = Config::builtin();
        config.upstream.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::builtin();
        config.upstream.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
