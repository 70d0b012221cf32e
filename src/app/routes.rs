use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use serde_json::json;

use crate::app::state::AppState;
use crate::error::AppError;
use crate::services::{self, HistoryPoint, QuoteResult, SearchResult};

const QUOTE_FAILURE_NOTE: &str = "Symbol might be invalid or Yahoo API changed";

/// Query string as ordered key/value pairs.
pub type QueryPairs = Vec<(String, String)>;

/// Handler failure, rendered as plain text for validation errors and as a JSON
/// envelope for everything else.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    note: Option<&'static str>,
}

impl ApiError {
    pub fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self { error, note: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_validation() {
            return (StatusCode::BAD_REQUEST, self.error.to_string()).into_response();
        }

        let mut body = json!({ "error": self.error.to_string() });
        if let Some(note) = self.note {
            body["note"] = json!(note);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// First non-blank value for `key`.
pub fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, value)| name == key && !value.is_empty())
        .map(|(_, value)| value.as_str())
}

fn require_param<'a>(
    pairs: &'a [(String, String)],
    key: &str,
    message: &str,
) -> Result<&'a str, ApiError> {
    first_param(pairs, key).ok_or_else(|| AppError::missing_parameter(message).into())
}

fn log_failure(route: &str, subject: &str, err: &AppError) {
    if err.is_transport() {
        warn!("{route} {subject:?}: upstream request failed: {err}");
    } else {
        warn!("{route} {subject:?}: {err}");
    }
}

/// `GET /api/quote?symbol=`
pub async fn quote(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> ApiResult<QuoteResult> {
    let symbol = require_param(&params, "symbol", "Missing symbol parameter")?;

    match services::fetch_quote(&state.upstream, symbol).await {
        Ok(quote) => Ok(Json(quote)),
        Err(err) => {
            log_failure("quote", symbol, &err);
            Err(ApiError::from(err).with_note(QUOTE_FAILURE_NOTE))
        }
    }
}

/// `GET /api/search?q=`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> ApiResult<Vec<SearchResult>> {
    let query = require_param(&params, "q", "Missing query parameter 'q'")?;

    services::fetch_search(&state.upstream, query)
        .await
        .map(Json)
        .map_err(|err| {
            log_failure("search", query, &err);
            err.into()
        })
}

/// `GET /api/history?symbol=&range=`
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> ApiResult<Vec<HistoryPoint>> {
    let symbol = require_param(&params, "symbol", "Missing symbol parameter")?;
    let range = first_param(&params, "range").unwrap_or(services::history::DEFAULT_RANGE);

    services::fetch_history(&state.upstream, symbol, range)
        .await
        .map(Json)
        .map_err(|err| {
            log_failure("history", symbol, &err);
            err.into()
        })
}
