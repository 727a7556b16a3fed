//! Error handlers
//!
//! Maps API errors onto HTTP responses in one place. Client-facing messages
//! stay generic; the real cause goes to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::error::types::{ListingError, ProxyError, RangeError, TokenError};
use crate::routes::responses::ErrorResponse;

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        warn!("Rejected identifier: {}", self);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid or expired link")),
        )
            .into_response()
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        error!("{}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to fetch files")),
        )
            .into_response()
    }
}

impl IntoResponse for RangeError {
    fn into_response(self) -> Response {
        warn!("{}", self);
        // 416 with no body
        StatusCode::RANGE_NOT_SATISFIABLE.into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::InvalidIdentifier(e) => e.into_response(),
            ProxyError::InvalidRange(e) => e.into_response(),
            ProxyError::UpstreamFetch(e) => {
                error!("Upstream fetch failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to download file")),
                )
                    .into_response()
            }
        }
    }
}
