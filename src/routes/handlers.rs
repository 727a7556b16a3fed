//! Route handlers
//!
//! One handler per API operation. Identifier decoding policy is declared
//! per route: listing and folder-path accept raw identifiers as a fallback,
//! download and preview reject anything that is not a valid token.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{LOCATION, RANGE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ProxyError;
use crate::navigate;
use crate::routes::responses::{ErrorResponse, FilesResponse, PathResponse};
use crate::server::AppState;
use crate::storage::{self, DriveProvider};
use crate::transfer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderQuery {
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub id: Option<String>,
}

/// `GET /api/files` - children of a folder, sorted, identifiers obfuscated
pub async fn list_files<P: DriveProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<FolderQuery>,
) -> Response {
    let Some(folder_id) = query.folder_id else {
        return missing_param("folderId");
    };
    let folder_id = state.codec.decode_lenient(&folder_id);

    match storage::list_directory(&state.provider, &state.codec, &folder_id).await {
        Ok(files) => Json(FilesResponse { files }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /api/folder-path` - breadcrumb trail, best-effort, never 500
pub async fn folder_path<P: DriveProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<FolderQuery>,
) -> Response {
    let Some(folder_id) = query.folder_id else {
        return missing_param("folderId");
    };
    let folder_id = state.codec.decode_lenient(&folder_id);

    let path = navigate::resolve_path(
        &state.provider,
        &state.codec,
        &folder_id,
        &state.root_folder_id,
    )
    .await;

    Json(PathResponse { path }).into_response()
}

/// `GET /api/download` - streams file bytes, honoring `Range`
pub async fn download<P: DriveProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<DownloadQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = query.id else {
        return missing_param("id");
    };
    let file_id = match state.codec.decode(&token) {
        Ok(file_id) => file_id,
        Err(e) => return e.into_response(),
    };

    let file = match state.provider.file_metadata(&file_id).await {
        Ok(file) => file,
        Err(e) => return ProxyError::UpstreamFetch(e).into_response(),
    };

    let range_header = headers.get(RANGE).and_then(|value| value.to_str().ok());

    match transfer::stream_file(&state.provider, &file, range_header).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// `GET /api/download/{token}/redirect` - 302 to the provider-hosted download
pub async fn download_redirect<P: DriveProvider>(
    State(state): State<Arc<AppState<P>>>,
    Path(token): Path<String>,
) -> Response {
    match state.codec.decode(&token) {
        Ok(file_id) => redirect_found(&state.provider.download_url(&file_id)),
        Err(e) => e.into_response(),
    }
}

/// `GET /api/preview/{token}` - 302 to the provider-hosted preview
pub async fn preview<P: DriveProvider>(
    State(state): State<Arc<AppState<P>>>,
    Path(token): Path<String>,
) -> Response {
    match state.codec.decode(&token) {
        Ok(file_id) => redirect_found(&state.provider.preview_url(&file_id)),
        Err(e) => e.into_response(),
    }
}

/// Bare `OPTIONS` on the streaming endpoints; the CORS layer decorates the
/// response when an Origin is present
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn missing_param(name: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(format!("{name} is required"))),
    )
        .into_response()
}

fn redirect_found(url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(LOCATION, location);
            response
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid or expired link")),
        )
            .into_response(),
    }
}
