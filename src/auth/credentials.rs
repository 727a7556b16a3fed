//! Credential storage
//!
//! Holds the service-account identity loaded from configuration.

/// Google service-account credentials
#[derive(Debug, Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    /// PEM-encoded RSA private key, newline-normalized
    pub private_key: String,
}

impl ServiceAccount {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
        }
    }
}
