//! HTTP API surface
//!
//! Route handlers and the canonical response shapes they serialize.

pub mod handlers;
pub mod responses;
