use serde::Serialize;

use crate::fetch::decode::{self, ChartDocument};
use crate::fetch::{FetchResult, UpstreamClient};
use crate::utils::round2;

pub const DEFAULT_RANGE: &str = "1d";
const FALLBACK_INTERVAL: &str = "1d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub time: i64,
    pub price: f64,
}

/// Range token paired with the sampling interval requested for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub range: String,
    pub interval: &'static str,
}

impl RangeSpec {
    /// Unknown tokens keep daily sampling and are still forwarded as given.
    pub fn resolve(range: &str) -> Self {
        let interval = match range {
            "1d" => "5m",
            "5d" => "30m",
            "1mo" => "1d",
            "1y" => "1wk",
            _ => FALLBACK_INTERVAL,
        };
        Self {
            range: range.to_string(),
            interval,
        }
    }
}

pub async fn fetch_history(
    client: &UpstreamClient,
    symbol: &str,
    range: &str,
) -> FetchResult<Vec<HistoryPoint>> {
    let spec = RangeSpec::resolve(range);
    let request = client.chart_request(symbol, &spec.range, spec.interval)?;
    let body = client.fetch(&request).await?;
    build_history(decode::decode_chart(&body)?)
}

pub fn build_history(document: ChartDocument) -> FetchResult<Vec<HistoryPoint>> {
    let result = document.into_first_result()?;
    let closes = result.closes()?;

    let points = result
        .timestamps()
        .iter()
        .zip(closes)
        .filter_map(|(&time, close)| {
            close.map(|price| HistoryPoint {
                time,
                price: round2(price),
            })
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn history(body: &str) -> FetchResult<Vec<HistoryPoint>> {
        build_history(decode::decode_chart(body.as_bytes()).unwrap())
    }

    #[test]
    fn maps_known_ranges_to_intervals() {
        assert_eq!(RangeSpec::resolve("1d").interval, "5m");
        assert_eq!(RangeSpec::resolve("5d").interval, "30m");
        assert_eq!(RangeSpec::resolve("1mo").interval, "1d");
        assert_eq!(RangeSpec::resolve("1y").interval, "1wk");
    }

    #[test]
    fn unknown_range_defaults_to_daily_but_is_forwarded() {
        let spec = RangeSpec::resolve("5y");
        assert_eq!(spec.range, "5y");
        assert_eq!(spec.interval, "1d");
    }

    #[test]
    fn drops_null_prices_and_rounds() {
        let points = history(
            r#"{"chart": {"result": [{
                "timestamp": [100, 200, 300],
                "indicators": {"quote": [{"close": [10.456, null, 12.0]}]}
            }]}}"#,
        )
        .unwrap();

        assert_eq!(
            points,
            vec![
                HistoryPoint { time: 100, price: 10.46 },
                HistoryPoint { time: 300, price: 12.0 },
            ]
        );
    }

    #[test]
    fn stops_at_shorter_series() {
        let points = history(
            r#"{"chart": {"result": [{
                "timestamp": [100, 200, 300, 400],
                "indicators": {"quote": [{"close": [1.0, 2.0]}]}
            }]}}"#,
        )
        .unwrap();
        assert_eq!(points.len(), 2);

        let points = history(
            r#"{"chart": {"result": [{
                "timestamp": [100],
                "indicators": {"quote": [{"close": [1.0, 2.0, 3.0]}]}
            }]}}"#,
        )
        .unwrap();
        assert_eq!(points, vec![HistoryPoint { time: 100, price: 1.0 }]);
    }

    #[test]
    fn missing_indicator_block_fails() {
        let err = history(r#"{"chart": {"result": [{"meta": {}}]}}"#).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        let err = history(
            r#"{"chart": {"result": [{"timestamp": [1, 2], "indicators": {"quote": []}}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn missing_close_list_is_empty_success() {
        let points =
            history(r#"{"chart": {"result": [{"indicators": {"quote": [{}]}}]}}"#).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn empty_result_list_fails() {
        assert!(history(r#"{"chart": {"result": []}}"#).is_err());
    }
}
