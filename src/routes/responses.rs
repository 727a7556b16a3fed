//! Canonical response shapes
//!
//! One schema per operation; the per-route variations of earlier drafts are
//! deliberately collapsed into these.

use serde::Serialize;

use crate::navigate::Breadcrumb;
use crate::storage::DirectoryEntry;

/// Body of `GET /api/files`
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub files: Vec<DirectoryEntry>,
}

/// Body of `GET /api/folder-path`
#[derive(Debug, Serialize)]
pub struct PathResponse {
    pub path: Vec<Breadcrumb>,
}

/// Generic error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
