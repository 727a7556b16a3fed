//! Identifier obfuscation
//!
//! Hides raw Drive file identifiers behind encrypted, client-safe tokens.

pub mod token;

pub use token::{NONCE_LEN, TokenCodec};
