//! Provider seam for the Drive backend
//!
//! The HTTP layer talks to storage through this trait so tests can swap in
//! an in-memory provider for the real REST client.

use bytes::Bytes;
use futures::stream::BoxStream;
use std::future::Future;

use crate::error::DriveError;
use crate::storage::results::DriveFile;
use crate::transfer::ByteRange;

/// Byte stream of file content plus what the provider reported about it
pub struct FileContent {
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes, DriveError>>,
}

/// Read-only storage operations used by the request handlers
pub trait DriveProvider: Send + Sync + 'static {
    /// All non-trashed children of a folder.
    fn list_children(
        &self,
        folder_id: &str,
    ) -> impl Future<Output = Result<Vec<DriveFile>, DriveError>> + Send;

    /// Metadata for a single file or folder.
    fn file_metadata(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<DriveFile, DriveError>> + Send;

    /// File bytes, optionally restricted to a byte range.
    fn fetch_content(
        &self,
        file_id: &str,
        range: Option<ByteRange>,
    ) -> impl Future<Output = Result<FileContent, DriveError>> + Send;

    /// Provider-hosted direct download URL for a raw identifier.
    fn download_url(&self, file_id: &str) -> String;

    /// Provider-hosted preview URL for a raw identifier.
    fn preview_url(&self, file_id: &str) -> String;
}
