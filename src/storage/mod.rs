//! Drive storage backend
//!
//! The REST client for the storage provider, the trait seam the HTTP layer
//! consumes it through, and the directory listing operation.

pub mod client;
pub mod operations;
pub mod provider;
pub mod results;

pub use client::DriveClient;
pub use operations::list_directory;
pub use provider::{DriveProvider, FileContent};
pub use results::{DirectoryEntry, DriveFile, FOLDER_MIME_TYPE};
