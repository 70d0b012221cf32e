//! Typed views of the Yahoo chart and search documents.
//!
//! Every field the gateway reads is optional so that a missing key surfaces as
//! an [`AppError::Upstream`] at the point of use rather than a decode failure
//! for the whole document. Type mismatches still fail decoding.

use serde::Deserialize;

use crate::error::AppError;

use super::FetchResult;

#[derive(Debug, Deserialize)]
pub struct ChartDocument {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Option<Vec<QuoteIndicator>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteIndicator {
    pub close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchDocument {
    pub quotes: Option<Vec<SearchQuote>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuote {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "quoteType")]
    pub quote_type: Option<String>,
}

pub fn decode_chart(body: &[u8]) -> FetchResult<ChartDocument> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::upstream(format!("Malformed chart payload: {err}")))
}

pub fn decode_search(body: &[u8]) -> FetchResult<SearchDocument> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::upstream(format!("Malformed search payload: {err}")))
}

impl ChartDocument {
    /// First element of `chart.result`. An empty or null list is an error, using the
    /// provider's own description when it sent one.
    pub fn into_first_result(self) -> FetchResult<ChartResult> {
        let ChartEnvelope { result, error } = self.chart;
        if let Some(first) = result.and_then(|results| results.into_iter().next()) {
            return Ok(first);
        }

        let detail = error.and_then(|err| match (err.code, err.description) {
            (Some(code), Some(description)) => Some(format!("{code}: {description}")),
            (None, Some(description)) => Some(description),
            (Some(code), None) => Some(code),
            (None, None) => None,
        });

        Err(AppError::upstream(
            detail.unwrap_or_else(|| "No price data found".to_string()),
        ))
    }
}

impl ChartResult {
    /// Close series of the first quote indicator block. The block itself must be
    /// present; a block without a `close` list reads as empty.
    pub fn closes(&self) -> FetchResult<&[Option<f64>]> {
        let block = self
            .indicators
            .as_ref()
            .and_then(|indicators| indicators.quote.as_deref())
            .and_then(|blocks| blocks.first())
            .ok_or_else(|| AppError::upstream("No quote indicators in chart payload"))?;
        Ok(block.close.as_deref().unwrap_or(&[]))
    }

    pub fn timestamps(&self) -> &[i64] {
        self.timestamp.as_deref().unwrap_or(&[])
    }
}

impl SearchDocument {
    pub fn into_quotes(self) -> Vec<SearchQuote> {
        self.quotes.unwrap_or_default()
    }
}
