//! Streaming response assembly.
//!
//! Computes status and headers for a resolved byte interval: 206 with
//! `Content-Range` for partial requests, 200 for full-file requests, and the
//! CORS exposure header the browser audio element needs to read range
//! metadata across origins.

use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use drivecast_core::storage::FileMetadata;
use drivecast_core::streaming::ByteRange;

use crate::error::ApiError;

/// Fallback when the upstream reports no MIME type.
const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Builds the streaming response around an already-opened body.
///
/// # Errors
/// - `ApiError::Internal` - Metadata produced an unrepresentable header value
pub fn build_stream_response(
    metadata: &FileMetadata,
    range: &ByteRange,
    body: Body,
) -> Result<Response<Body>, ApiError> {
    let content_type = if metadata.mime_type.is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        &metadata.mime_type
    };

    let mut response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, range.length().to_string())
        .header(header::CACHE_CONTROL, "no-cache")
        .header(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            "Content-Range, Content-Length",
        );

    if range.is_partial {
        response = response
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, range.content_range());
    } else {
        response = response.status(StatusCode::OK);
    }

    response.body(body).map_err(|e| ApiError::Internal {
        reason: format!("failed to assemble stream response: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(size: u64) -> FileMetadata {
        FileMetadata {
            id: "f1".to_string(),
            name: "song.mp3".to_string(),
            size,
            mime_type: "audio/mpeg".to_string(),
        }
    }

    fn header_str<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_partial_response_headers() {
        let range = ByteRange::parse(Some("bytes=0-1023"), 1_000_000).unwrap();
        let response = build_stream_response(&metadata(1_000_000), &range, Body::empty()).unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            header_str(&response, "content-range"),
            Some("bytes 0-1023/1000000")
        );
        assert_eq!(header_str(&response, "content-length"), Some("1024"));
        assert_eq!(header_str(&response, "accept-ranges"), Some("bytes"));
        assert_eq!(
            header_str(&response, "access-control-expose-headers"),
            Some("Content-Range, Content-Length")
        );
    }

    #[test]
    fn test_full_response_headers() {
        let range = ByteRange::parse(None, 4096).unwrap();
        let response = build_stream_response(&metadata(4096), &range, Body::empty()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("content-range").is_none());
        assert_eq!(header_str(&response, "content-length"), Some("4096"));
        assert_eq!(header_str(&response, "accept-ranges"), Some("bytes"));
    }

    #[test]
    fn test_missing_mime_type_falls_back() {
        let mut meta = metadata(100);
        meta.mime_type = String::new();
        let range = ByteRange::parse(None, 100).unwrap();
        let response = build_stream_response(&meta, &range, Body::empty()).unwrap();

        assert_eq!(header_str(&response, "content-type"), Some("audio/mpeg"));
    }
}
