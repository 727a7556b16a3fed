//! Error types
//!
//! Defines domain-specific error types for each module of the drive proxy.

use thiserror::Error;

/// Token codec errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: expected <nonce-hex>:<ciphertext-hex>")]
    Malformed,

    #[error("token decryption failed")]
    Decryption,
}

/// Service-account authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to sign service-account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned status {0}")]
    TokenEndpoint(u16),
}

/// Drive API errors
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("drive request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("drive returned status {status} for {context}")]
    Status { status: u16, context: String },

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

/// Directory listing failure, carrying the folder that was being listed
#[derive(Debug, Error)]
#[error("failed to list folder {folder_id}: {source}")]
pub struct ListingError {
    pub folder_id: String,
    #[source]
    pub source: DriveError,
}

/// Range header errors
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("malformed range header: {0}")]
    Malformed(String),

    #[error("unsatisfiable range: start {start} beyond size {size}")]
    Unsatisfiable { start: u64, size: u64 },
}

/// Content proxy errors, one variant per failing step of the request flow
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] TokenError),

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] DriveError),

    #[error(transparent)]
    InvalidRange(#[from] RangeError),
}

/// Top-level server error for startup and shutdown paths
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
