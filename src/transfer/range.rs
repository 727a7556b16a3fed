//! Byte-range parsing for seekable media playback
//!
//! Accepts the single-range form `bytes=<start>-<end>?` only. Anything
//! else, including suffix and multi-range forms, is answered with 416.

use crate::error::RangeError;

/// Inclusive byte range resolved against a known total size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for an upstream `Range` request header
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// Value for a `Content-Range` response header
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }
}

/// Parses a `Range` request header against the total resource size.
///
/// A missing end defaults to the last byte; an end past the last byte is
/// clamped to it.
pub fn parse_range_header(header: &str, total_size: u64) -> Result<ByteRange, RangeError> {
    let range_spec = header
        .strip_prefix("bytes=")
        .ok_or_else(|| RangeError::Malformed(header.to_string()))?;
    let (start_str, end_str) = range_spec
        .split_once('-')
        .ok_or_else(|| RangeError::Malformed(header.to_string()))?;

    let start: u64 = start_str
        .trim()
        .parse()
        .map_err(|_| RangeError::Malformed(header.to_string()))?;
    let end: u64 = match end_str.trim() {
        "" => total_size.saturating_sub(1),
        s => s
            .parse()
            .map_err(|_| RangeError::Malformed(header.to_string()))?,
    };

    if start >= total_size {
        return Err(RangeError::Unsatisfiable {
            start,
            size: total_size,
        });
    }
    if start > end {
        return Err(RangeError::Malformed(header.to_string()));
    }

    Ok(ByteRange {
        start,
        end: end.min(total_size - 1),
    })
}
