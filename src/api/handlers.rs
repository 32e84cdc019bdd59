use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::SearchResult;
use crate::error::{SearchError, ValidationError};
use crate::search::{GistSearcher, SearchQuery};

use super::models::{ErrorResponse, SearchRequest};

pub async fn ping_handler() -> &'static str {
    "pong"
}

pub async fn search_handler(
    State(searcher): State<Arc<GistSearcher>>,
    body: Bytes,
) -> Result<Json<SearchResult>, SearchError> {
    let start = Instant::now();
    let query = parse_query(&body)?;

    let result = searcher.search(&query).await?;

    tracing::info!(
        "search for {} finished in {}ms",
        query.username,
        start.elapsed().as_millis()
    );
    Ok(Json(result))
}

/// Newline-delimited JSON: one object per match, or a single "no matches" object.
pub async fn search_stream_handler(
    State(searcher): State<Arc<GistSearcher>>,
    body: Bytes,
) -> Result<Response, SearchError> {
    let query = parse_query(&body)?;
    let results = searcher.search_stream(query).await?;

    let lines = results.map(|item| {
        let line = match item {
            Ok(result) => serde_json::to_vec(&result),
            Err(e) => serde_json::to_vec(&ErrorResponse::new(e.to_string())),
        };
        line.map(|mut line| {
            line.push(b'\n');
            line
        })
    });

    Ok((
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response())
}

/// Body parsing is done by hand so malformed JSON gets the same error shape as
/// every other validation failure.
fn parse_query(body: &[u8]) -> Result<SearchQuery, ValidationError> {
    let request: SearchRequest = serde_json::from_slice(body)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    SearchQuery::new(
        request.username,
        request.pattern,
        request.page,
        request.per_page,
    )
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
