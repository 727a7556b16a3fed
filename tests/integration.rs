//! Router-level tests against an in-memory provider.
//!
//! Exercises the full HTTP surface the way a browser client would, with the
//! Drive backend replaced by a fake so no network is involved.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use tower::ServiceExt;

use rax_drive_proxy::crypto::TokenCodec;
use rax_drive_proxy::error::DriveError;
use rax_drive_proxy::server::{AppState, router};
use rax_drive_proxy::storage::{DriveFile, DriveProvider, FOLDER_MIME_TYPE, FileContent};
use rax_drive_proxy::transfer::ByteRange;

const TEST_KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
const ROOT: &str = "root-folder";

#[derive(Default, Clone)]
struct FakeProvider {
    children: HashMap<String, Vec<DriveFile>>,
    metadata: HashMap<String, DriveFile>,
    content: HashMap<String, Bytes>,
    fail_metadata: Vec<String>,
}

fn not_found(context: &str) -> DriveError {
    DriveError::Status {
        status: 404,
        context: context.to_string(),
    }
}

impl DriveProvider for FakeProvider {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveFile>, DriveError> {
        self.children
            .get(folder_id)
            .cloned()
            .ok_or_else(|| not_found(folder_id))
    }

    async fn file_metadata(&self, file_id: &str) -> Result<DriveFile, DriveError> {
        if self.fail_metadata.iter().any(|id| id == file_id) {
            return Err(DriveError::Status {
                status: 500,
                context: file_id.to_string(),
            });
        }
        self.metadata
            .get(file_id)
            .cloned()
            .ok_or_else(|| not_found(file_id))
    }

    async fn fetch_content(
        &self,
        file_id: &str,
        range: Option<ByteRange>,
    ) -> Result<FileContent, DriveError> {
        let bytes = self
            .content
            .get(file_id)
            .cloned()
            .ok_or_else(|| not_found(file_id))?;
        let bytes = match range {
            Some(range) => bytes.slice(range.start as usize..=range.end as usize),
            None => bytes,
        };
        let len = bytes.len() as u64;
        Ok(FileContent {
            content_length: Some(len),
            stream: stream::iter(vec![Ok::<_, DriveError>(bytes)]).boxed(),
        })
    }

    fn download_url(&self, file_id: &str) -> String {
        format!("https://drive.example.test/uc?id={file_id}")
    }

    fn preview_url(&self, file_id: &str) -> String {
        format!("https://drive.example.test/preview/{file_id}")
    }
}

fn folder(id: &str, name: &str, parent: &str) -> DriveFile {
    DriveFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: FOLDER_MIME_TYPE.to_string(),
        size: None,
        modified_time: None,
        parents: Some(vec![parent.to_string()]),
    }
}

fn media_file(id: &str, name: &str, mime: &str, size: u64) -> DriveFile {
    DriveFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime.to_string(),
        size: Some(size),
        modified_time: Some("2024-05-01T12:00:00.000Z".to_string()),
        parents: Some(vec![ROOT.to_string()]),
    }
}

/// Root listing plus a two-level folder chain and one streamable video
fn fixture() -> FakeProvider {
    let video = media_file("fid-video", "clip.mp4", "video/mp4", 1000);
    let season = folder("fid-season", "Season 1", ROOT);
    let episodes = folder("fid-episodes", "Episodes", "fid-season");

    let mut provider = FakeProvider::default();
    provider.children.insert(
        ROOT.to_string(),
        vec![
            media_file("fid-b", "b.txt", "text/plain", 10),
            season.clone(),
            media_file("fid-a", "a.txt", "text/plain", 10),
        ],
    );
    provider.metadata.insert("fid-video".to_string(), video);
    provider.metadata.insert("fid-season".to_string(), season);
    provider
        .metadata
        .insert("fid-episodes".to_string(), episodes);
    provider.content.insert(
        "fid-video".to_string(),
        Bytes::from((0..1000u32).map(|i| (i % 251) as u8).collect::<Vec<u8>>()),
    );
    provider
}

fn codec() -> TokenCodec {
    TokenCodec::new(TEST_KEY)
}

fn app(provider: FakeProvider) -> Router {
    router(Arc::new(AppState {
        provider,
        codec: codec(),
        root_folder_id: ROOT.to_string(),
    }))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Bytes) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

#[tokio::test]
async fn test_list_files_sorted_and_obfuscated() {
    let (status, _, body) = get(app(fixture()), &format!("/api/files?folderId={ROOT}")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let files = json["files"].as_array().unwrap();
    let names: Vec<&str> = files.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Season 1", "a.txt", "b.txt"]);

    // Every exposed identifier decodes back to the raw one; none leak as-is
    let codec = codec();
    assert_eq!(
        codec.decode(files[0]["id"].as_str().unwrap()).unwrap(),
        "fid-season"
    );
    assert!(!String::from_utf8_lossy(&body).contains("fid-"));
}

#[tokio::test]
async fn test_list_files_accepts_encoded_folder_id() {
    let token = codec().encode(ROOT);
    let (status, _, body) = get(app(fixture()), &format!("/api/files?folderId={token}")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["files"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_files_requires_folder_id() {
    let (status, _, body) = get(app(fixture()), "/api/files").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("folderId"));
}

#[tokio::test]
async fn test_list_files_upstream_failure_is_500() {
    let (status, _, body) = get(app(fixture()), "/api/files?folderId=unknown-folder").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Failed to fetch files");
}

#[tokio::test]
async fn test_folder_path_empty_at_root() {
    let (status, _, body) = get(app(fixture()), &format!("/api/folder-path?folderId={ROOT}")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["path"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_folder_path_walks_to_root() {
    let token = codec().encode("fid-episodes");
    let (status, _, body) = get(
        app(fixture()),
        &format!("/api/folder-path?folderId={token}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let path = json["path"].as_array().unwrap();
    let names: Vec<&str> = path.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Season 1", "Episodes"]);

    let codec = codec();
    assert_eq!(
        codec.decode(path[1]["id"].as_str().unwrap()).unwrap(),
        "fid-episodes"
    );
}

#[tokio::test]
async fn test_folder_path_partial_on_lookup_failure() {
    let mut provider = fixture();
    provider.fail_metadata.push("fid-season".to_string());

    let (status, _, body) = get(
        app(provider),
        "/api/folder-path?folderId=fid-episodes",
    )
    .await;
    // Best-effort: the walk keeps what it resolved before the failure
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let path = json["path"].as_array().unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path[0]["name"], "Episodes");
}

#[tokio::test]
async fn test_download_streams_full_file() {
    let token = codec().encode("fid-video");
    let (status, headers, body) = get(app(fixture()), &format!("/api/download?id={token}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[header::CONTENT_LENGTH], "1000");
    assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
    assert!(
        headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment")
    );
    assert_eq!(body.len(), 1000);
}

#[tokio::test]
async fn test_download_honors_byte_range() {
    let token = codec().encode("fid-video");
    let response = app(fixture())
        .oneshot(
            Request::builder()
                .uri(format!("/api/download?id={token}"))
                .header(header::RANGE, "bytes=100-199")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 100-199/1000"
    );
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "100");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.len(), 100);
    assert_eq!(body[0], (100 % 251) as u8);
}

#[tokio::test]
async fn test_download_rejects_unsatisfiable_range() {
    let token = codec().encode("fid-video");
    let response = app(fixture())
        .oneshot(
            Request::builder()
                .uri(format!("/api/download?id={token}"))
                .header(header::RANGE, "bytes=2000-2100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_download_rejects_invalid_token() {
    let (status, _, body) = get(app(fixture()), "/api/download?id=not-a-valid-token").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Invalid or expired link");
}

#[tokio::test]
async fn test_download_requires_id() {
    let (status, _, _) = get(app(fixture()), "/api/download").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_redirect_points_at_provider() {
    let token = codec().encode("fid-video");
    let (status, headers, _) = get(
        app(fixture()),
        &format!("/api/download/{token}/redirect"),
    )
    .await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(
        headers[header::LOCATION],
        "https://drive.example.test/uc?id=fid-video"
    );
}

#[tokio::test]
async fn test_preview_redirects_to_provider() {
    let token = codec().encode("fid-video");
    let (status, headers, _) = get(app(fixture()), &format!("/api/preview/{token}")).await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(
        headers[header::LOCATION],
        "https://drive.example.test/preview/fid-video"
    );
}

#[tokio::test]
async fn test_preview_rejects_invalid_token() {
    let (status, _, _) = get(app(fixture()), "/api/preview/garbage").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_preflight_allows_range_requests() {
    let response = app(fixture())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/download")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allow_methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(allow_methods.contains("GET"));
    assert!(allow_methods.contains("HEAD"));
    assert!(allow_methods.contains("OPTIONS"));
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_bare_options_returns_ok() {
    let response = app(fixture())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}
