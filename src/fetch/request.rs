use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use urlencoding::encode;

use crate::error::{AppError, Context};

use super::FetchResult;

pub const CHART_PATH: &str = "/v8/finance/chart";
pub const SEARCH_PATH: &str = "/v1/finance/search";
pub const SEARCH_QUOTES_COUNT: u32 = 6;
pub const SEARCH_NEWS_COUNT: u32 = 0;

#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
}

/// Chart endpoint request. Every interpolated segment is percent-encoded.
pub fn prepare_chart_request(
    base_url: &str,
    user_agent: &str,
    symbol: &str,
    range: &str,
    interval: &str,
) -> FetchResult<PreparedRequest> {
    let url = format!(
        "{base_url}{CHART_PATH}/{symbol}?range={range}&interval={interval}",
        symbol = encode(symbol),
        range = encode(range),
        interval = encode(interval),
    );
    let headers = build_headers(user_agent)?;

    Ok(PreparedRequest { url, headers })
}

pub fn prepare_search_request(
    base_url: &str,
    user_agent: &str,
    query: &str,
) -> FetchResult<PreparedRequest> {
    let url = format!(
        "{base_url}{SEARCH_PATH}?q={query}&quotesCount={SEARCH_QUOTES_COUNT}&newsCount={SEARCH_NEWS_COUNT}",
        query = encode(query),
    );
    let headers = build_headers(user_agent)?;

    Ok(PreparedRequest { url, headers })
}

fn build_headers(user_agent: &str) -> FetchResult<HeaderMap> {
    if user_agent.trim().is_empty() {
        return Err(AppError::message("Upstream user agent must not be empty"));
    }

    let mut map = HeaderMap::new();
    let value = HeaderValue::from_str(user_agent)
        .with_context(|| format!("Invalid user agent header value: {}", user_agent))?;
    map.insert(USER_AGENT, value);
    map.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://query1.finance.yahoo.com";

    #[test]
    fn chart_request_carries_range_and_interval() {
        let request = prepare_chart_request(BASE, "Mozilla/5.0", "RELIANCE.NS", "1mo", "1d").unwrap();
        assert_eq!(
            request.url,
            "https://query1.finance.yahoo.com/v8/finance/chart/RELIANCE.NS?range=1mo&interval=1d"
        );
        assert_eq!(request.headers.get(USER_AGENT).unwrap(), "Mozilla/5.0");
        assert_eq!(request.headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn chart_request_encodes_symbol_path_segment() {
        let request = prepare_chart_request(BASE, "Mozilla/5.0", "^NSEI/../x?y", "1d", "5m").unwrap();
        assert!(request
            .url
            .starts_with("https://query1.finance.yahoo.com/v8/finance/chart/%5ENSEI%2F..%2Fx%3Fy?"));
    }

    #[test]
    fn search_request_encodes_query() {
        let request = prepare_search_request(BASE, "Mozilla/5.0", "tata motors&x=1").unwrap();
        assert_eq!(
            request.url,
            "https://query1.finance.yahoo.com/v1/finance/search?q=tata%20motors%26x%3D1&quotesCount=6&newsCount=0"
        );
    }

    #[test]
    fn rejects_blank_user_agent() {
        assert!(prepare_search_request(BASE, "  ", "tcs").is_err());
    }
}
