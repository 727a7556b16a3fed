//! Transfer module
//!
//! Byte-range parsing and the streaming content proxy that relays Drive
//! file bytes to HTTP clients.

pub mod operations;
pub mod range;

pub use operations::stream_file;
pub use range::{ByteRange, parse_range_header};
