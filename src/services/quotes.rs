use serde::Serialize;

use crate::error::AppError;
use crate::fetch::decode::{self, ChartDocument};
use crate::fetch::{FetchResult, UpstreamClient};
use crate::utils::round2;

const QUOTE_RANGE: &str = "1d";
const QUOTE_INTERVAL: &str = "1d";

/// Latest price snapshot returned by `/api/quote`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub currency: Option<String>,
}

pub async fn fetch_quote(client: &UpstreamClient, symbol: &str) -> FetchResult<QuoteResult> {
    let request = client.chart_request(symbol, QUOTE_RANGE, QUOTE_INTERVAL)?;
    let body = client.fetch(&request).await?;
    build_quote(symbol, decode::decode_chart(&body)?)
}

pub fn build_quote(symbol: &str, document: ChartDocument) -> FetchResult<QuoteResult> {
    let result = document.into_first_result()?;
    let meta = result
        .meta
        .ok_or_else(|| AppError::upstream("No price data found"))?;

    let price = meta
        .regular_market_price
        .ok_or_else(|| AppError::upstream("No price data found"))?;

    let previous_close = match meta.chart_previous_close {
        Some(value) if value != 0.0 => value,
        Some(_) => {
            return Err(AppError::upstream(format!(
                "Previous close for {} is zero; cannot compute change",
                symbol
            )))
        }
        None => {
            return Err(AppError::upstream(format!(
                "No previous close found for {}",
                symbol
            )))
        }
    };

    let change = price - previous_close;
    let change_pct = change / previous_close * 100.0;

    Ok(QuoteResult {
        symbol: symbol.to_uppercase(),
        price,
        change: round2(change),
        change_pct: round2(change_pct),
        currency: meta.currency,
    })
}
