//! Service-account authentication
//!
//! Signs Google service-account assertions and manages the cached OAuth2
//! bearer token used by every Drive API call.

pub mod credentials;
pub mod tokens;

pub use credentials::ServiceAccount;
pub use tokens::TokenManager;
