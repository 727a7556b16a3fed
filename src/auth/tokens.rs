//! OAuth2 token management
//!
//! Exchanges a signed JWT assertion for a bearer token at Google's token
//! endpoint and caches it until shortly before expiry. The cache is the only
//! mutable process-wide state in the proxy.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::auth::credentials::ServiceAccount;
use crate::error::AuthError;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

// Refresh before Google actually expires the token
const REFRESH_MARGIN_SECS: u64 = 60;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: u64,
    iat: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    bearer: String,
    expires_at: Instant,
}

pub struct TokenManager {
    http: reqwest::Client,
    account: ServiceAccount,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, account: ServiceAccount) -> Self {
        Self {
            http,
            account,
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, refreshing through the token endpoint
    /// when the cached one is missing or about to expire.
    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.bearer.clone());
                }
            }
        }

        let mut slot = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.bearer.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let bearer = fresh.bearer.clone();
        *slot = Some(fresh);
        Ok(bearer)
    }

    async fn fetch_token(&self) -> Result<CachedToken, AuthError> {
        let assertion = self.sign_assertion()?;

        debug!("Requesting bearer token for {}", self.account.client_email);
        let response = self
            .http
            .post(TOKEN_URI)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::TokenEndpoint(status.as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        let ttl = token.expires_in.saturating_sub(REFRESH_MARGIN_SECS);

        info!(
            "Obtained bearer token for {} (valid {}s)",
            self.account.client_email, token.expires_in
        );

        Ok(CachedToken {
            bearer: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(ttl),
        })
    }

    fn sign_assertion(&self) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let claims = Claims {
            iss: &self.account.client_email,
            scope: DRIVE_SCOPE,
            aud: TOKEN_URI,
            exp: now + ASSERTION_LIFETIME_SECS,
            iat: now,
        };

        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }
}
