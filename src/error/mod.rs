//! Error handling
//!
//! Defines error types and their HTTP status mapping for the drive proxy.

pub mod handlers;
pub mod types;

pub use types::*;
