use serde::Serialize;

use crate::fetch::decode::{self, SearchDocument, SearchQuote};
use crate::fetch::{FetchResult, UpstreamClient};

/// Exchange codes Yahoo uses for the National and Bombay stock exchanges.
pub const ALLOWED_EXCHANGES: [&str; 4] = ["NSI", "BSE", "NSE", "BOM"];
pub const ALLOWED_SUFFIXES: [&str; 2] = [".NS", ".BO"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub symbol: String,
    pub shortname: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub async fn fetch_search(client: &UpstreamClient, query: &str) -> FetchResult<Vec<SearchResult>> {
    let request = client.search_request(query)?;
    let body = client.fetch(&request).await?;
    Ok(build_search_results(decode::decode_search(&body)?))
}

/// Indian listings only, in upstream order.
pub fn build_search_results(document: SearchDocument) -> Vec<SearchResult> {
    document
        .into_quotes()
        .into_iter()
        .filter_map(to_search_result)
        .collect()
}

pub fn is_indian_listing(exchange: &str, symbol: &str) -> bool {
    ALLOWED_EXCHANGES.contains(&exchange)
        || ALLOWED_SUFFIXES
            .iter()
            .any(|suffix| symbol.ends_with(suffix))
}

fn to_search_result(quote: SearchQuote) -> Option<SearchResult> {
    let symbol = quote.symbol.unwrap_or_default();
    let exchange = quote.exchange.unwrap_or_default();
    if !is_indian_listing(&exchange, &symbol) {
        return None;
    }

    let shortname = quote
        .shortname
        .or(quote.longname)
        .unwrap_or_else(|| symbol.clone());

    Some(SearchResult {
        symbol,
        shortname,
        exchange,
        kind: quote.quote_type.unwrap_or_default(),
    })
}
