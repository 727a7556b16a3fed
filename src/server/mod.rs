//! Server module
//!
//! Owns the listener, the shared request state, and router assembly.

pub mod core;

pub use core::{AppState, Server, router};
