//! Content streaming
//!
//! Relays a Drive content stream onto the HTTP response body. Bytes are
//! forwarded as they arrive from upstream; nothing is buffered beyond the
//! in-flight chunk, and an upstream error after headers have gone out
//! surfaces as an aborted connection rather than a truncated-but-clean 200.

use axum::body::Body;
use axum::http::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use log::info;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::ProxyError;
use crate::storage::{DriveFile, DriveProvider};
use crate::transfer::range::parse_range_header;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const CACHE_POLICY: &str = "public, max-age=3600";

/// Streams a file's bytes to the client, honoring an optional `Range`
/// header. A range against a file of unknown total size degrades to a full
/// 200 response, since 206 headers cannot be formed without the size.
pub async fn stream_file<P: DriveProvider>(
    provider: &P,
    file: &DriveFile,
    range_header: Option<&str>,
) -> Result<Response, ProxyError> {
    let range = match (range_header, file.size) {
        (Some(header), Some(size)) => Some((parse_range_header(header, size)?, size)),
        _ => None,
    };

    let content = provider.fetch_content(&file.id, range.map(|(r, _)| r)).await?;

    let mime = if file.mime_type.is_empty() {
        FALLBACK_CONTENT_TYPE
    } else {
        &file.mime_type
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(&file.name, NON_ALPHANUMERIC)
    );

    let mut response = Response::new(Body::from_stream(content.stream));
    *response.status_mut() = match range {
        Some(_) => StatusCode::PARTIAL_CONTENT,
        None => StatusCode::OK,
    };

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(mime)
            .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
    );
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY));

    match range {
        Some((range, total_size)) => {
            headers.insert(
                CONTENT_RANGE,
                HeaderValue::from_str(&range.content_range(total_size))
                    .unwrap_or_else(|_| HeaderValue::from_static("bytes */0")),
            );
            headers.insert(CONTENT_LENGTH, HeaderValue::from(range.len()));
            info!(
                "Streaming {} bytes {}-{} of {} ({})",
                file.name, range.start, range.end, total_size, mime
            );
        }
        None => {
            if let Some(size) = content.content_length.or(file.size) {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
            }
            info!("Streaming {} ({})", file.name, mime);
        }
    }

    Ok(response)
}
