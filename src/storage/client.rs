//! Google Drive REST client
//!
//! One authenticated client shared by every request. Metadata and listing
//! calls run under a total timeout; content streams only get a connect
//! timeout so long media transfers are not cut off mid-play.

use futures::{StreamExt, TryStreamExt};
use log::debug;
use reqwest::header::RANGE;
use serde::Deserialize;

use crate::auth::{ServiceAccount, TokenManager};
use crate::config::ProxyConfig;
use crate::error::{DriveError, ServerError};
use crate::storage::provider::{DriveProvider, FileContent};
use crate::storage::results::DriveFile;
use crate::transfer::ByteRange;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size, modifiedTime, parents)";
const FILE_FIELDS: &str = "id, name, mimeType, size, modifiedTime, parents";
const LIST_PAGE_SIZE: &str = "1000";

pub struct DriveClient {
    api: reqwest::Client,
    media: reqwest::Client,
    auth: TokenManager,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl DriveClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, ServerError> {
        let api = reqwest::Client::builder()
            .timeout(config.metadata_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let media = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        let account = ServiceAccount::new(&config.client_email, config.normalized_private_key());
        let auth = TokenManager::new(api.clone(), account);

        Ok(Self { api, media, auth })
    }

    fn ensure_success(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, DriveError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(DriveError::Status {
                status: status.as_u16(),
                context: context.to_string(),
            })
        }
    }
}

impl DriveProvider for DriveClient {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveFile>, DriveError> {
        let bearer = self.auth.bearer_token().await?;
        let query = format!(
            "'{}' in parents and trashed = false",
            folder_id.replace('\'', "\\'")
        );

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .api
                .get(format!("{DRIVE_API_BASE}/files"))
                .bearer_auth(&bearer)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", LIST_FIELDS),
                    ("pageSize", LIST_PAGE_SIZE),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            let response = Self::ensure_success(response, folder_id)?;
            let page: FileListPage = response.json().await?;

            files.extend(page.files);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Drive listed {} children of {}", files.len(), folder_id);
        Ok(files)
    }

    async fn file_metadata(&self, file_id: &str) -> Result<DriveFile, DriveError> {
        let bearer = self.auth.bearer_token().await?;

        let response = self
            .api
            .get(format!("{DRIVE_API_BASE}/files/{file_id}"))
            .bearer_auth(&bearer)
            .query(&[("fields", FILE_FIELDS)])
            .send()
            .await?;
        let response = Self::ensure_success(response, file_id)?;

        Ok(response.json().await?)
    }

    async fn fetch_content(
        &self,
        file_id: &str,
        range: Option<ByteRange>,
    ) -> Result<FileContent, DriveError> {
        let bearer = self.auth.bearer_token().await?;

        let mut request = self
            .media
            .get(format!("{DRIVE_API_BASE}/files/{file_id}"))
            .bearer_auth(&bearer)
            .query(&[("alt", "media")]);
        if let Some(range) = range {
            request = request.header(RANGE, range.header_value());
        }

        let response = request.send().await?;
        let response = Self::ensure_success(response, file_id)?;

        let content_length = response.content_length();
        let stream = response.bytes_stream().map_err(DriveError::from).boxed();

        Ok(FileContent {
            content_length,
            stream,
        })
    }

    fn download_url(&self, file_id: &str) -> String {
        format!("https://drive.google.com/uc?export=download&id={file_id}&confirm=t")
    }

    fn preview_url(&self, file_id: &str) -> String {
        format!("https://drive.google.com/file/d/{file_id}/preview")
    }
}
