//! Token codec
//!
//! Two-way mapping between raw Drive file identifiers and opaque tokens of
//! the form `<nonce-hex>:<ciphertext-hex>`, AES-256-GCM under a fixed
//! process-wide secret. Every encoding draws a fresh nonce, so the same
//! identifier never produces the same token twice; only the decoded
//! identifier is stable enough to compare or cache.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crate::error::TokenError;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct TokenCodec {
    key: [u8; 32],
}

impl TokenCodec {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Encrypts a raw file identifier into an opaque token.
    pub fn encode(&self, file_id: &str) -> String {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), file_id.as_bytes())
            .expect("encrypt");

        format!("{}:{}", hex::encode(nonce), hex::encode(ciphertext))
    }

    /// Decrypts a token back into the raw file identifier.
    ///
    /// Fails with `TokenError::Malformed` when the input does not split into
    /// two non-empty hex components, and `TokenError::Decryption` when the
    /// ciphertext does not authenticate under the configured key.
    pub fn decode(&self, token: &str) -> Result<String, TokenError> {
        let (nonce_hex, cipher_hex) = token.split_once(':').ok_or(TokenError::Malformed)?;
        if nonce_hex.is_empty() || cipher_hex.is_empty() {
            return Err(TokenError::Malformed);
        }

        let nonce = hex::decode(nonce_hex).map_err(|_| TokenError::Malformed)?;
        if nonce.len() != NONCE_LEN {
            return Err(TokenError::Malformed);
        }
        let ciphertext = hex::decode(cipher_hex).map_err(|_| TokenError::Malformed)?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|_| TokenError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| TokenError::Decryption)
    }

    /// Decodes a token, treating undecodable input as an already-raw
    /// identifier. This is the declared leniency for listing and path
    /// endpoints, kept for backward compatibility with un-obfuscated links;
    /// the download and preview endpoints use strict [`decode`](Self::decode)
    /// instead.
    pub fn decode_lenient(&self, input: &str) -> String {
        match self.decode(input) {
            Ok(file_id) => file_id,
            Err(_) => input.to_string(),
        }
    }
}
