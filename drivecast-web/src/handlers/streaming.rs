//! Audio streaming endpoint.
//!
//! Control flow per request: token lookup, expiry check, fresh metadata
//! resolution, range parsing, relay open, response assembly. Metadata is
//! never cached; every request re-validates against the upstream.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Response, header};
use drivecast_core::streaming::ByteRange;
use tracing::info;

use super::{TokenQuery, authorize, response::build_stream_response};
use crate::error::ApiError;
use crate::server::AppState;

/// `GET /api/stream/{file_id}` with optional `Range: bytes=<start>-[<end>]`.
///
/// Answers 206 with `Content-Range` for valid range requests, 200 for
/// requests without one. The body is relayed from the upstream as it
/// arrives; a mid-transfer upstream failure aborts the connection so the
/// client sees truncation rather than a clean end.
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Response<Body>, ApiError> {
    let credential = authorize(&state, &query.token)?;

    let metadata = state.provider.file_metadata(&credential, &file_id).await?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let range = ByteRange::parse(range_header, metadata.size)?;

    let stream = state.relay.open(&credential, &file_id, range).await?;

    info!(
        "Streaming '{}' bytes {}-{}/{} ({})",
        metadata.name,
        range.start,
        range.end,
        metadata.size,
        if range.is_partial { "partial" } else { "full" },
    );

    build_stream_response(&metadata, &range, Body::from_stream(stream))
}
