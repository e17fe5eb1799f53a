//! HTTP Range header parsing against a known file size.
//!
//! Implements the single-range `bytes=<start>-[<end>]` form of RFC 7233.
//! Suffix ranges (`bytes=-500`) and multi-range requests are not supported
//! and are rejected as malformed; no browser audio element emits them.

/// Malformed or unsatisfiable range requests.
///
/// The request boundary maps all of these to `416 Range Not Satisfiable`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Malformed range header: {value}")]
    Malformed { value: String },

    #[error("Range start {start} is after end {end}")]
    StartAfterEnd { start: u64, end: u64 },

    #[error("Range start {start} is beyond file size {size}")]
    Unsatisfiable { start: u64, size: u64 },
}

/// Inclusive byte interval over a file of known total size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total_size: u64,
    /// False when no Range header was given; the response is then a full 200
    /// rather than a 206.
    pub is_partial: bool,
}

impl ByteRange {
    /// Range covering the whole file, as served for requests without a
    /// Range header.
    pub fn full(total_size: u64) -> Self {
        Self {
            start: 0,
            end: total_size.saturating_sub(1),
            total_size,
            is_partial: false,
        }
    }

    /// Parses an optional Range header value against the file size.
    ///
    /// A missing header yields the full range. An explicit end beyond the
    /// last byte is clamped to `total_size - 1` per RFC 7233; a missing end
    /// defaults to the same.
    ///
    /// # Errors
    /// - `RangeError::Malformed` - Not a single `bytes=<start>-[<end>]` form
    /// - `RangeError::StartAfterEnd` - Start past the requested end
    /// - `RangeError::Unsatisfiable` - Start at or beyond the file size
    pub fn parse(header: Option<&str>, total_size: u64) -> Result<Self, RangeError> {
        let Some(header) = header else {
            return Ok(Self::full(total_size));
        };

        let malformed = || RangeError::Malformed {
            value: header.to_string(),
        };

        let spec = header.strip_prefix("bytes=").ok_or_else(malformed)?;
        if spec.contains(',') {
            return Err(malformed());
        }

        let (start_str, end_str) = spec.split_once('-').ok_or_else(malformed)?;
        let start = start_str.parse::<u64>().map_err(|_| malformed())?;

        let end = if end_str.is_empty() {
            total_size.saturating_sub(1)
        } else {
            let end = end_str.parse::<u64>().map_err(|_| malformed())?;
            if start > end {
                return Err(RangeError::StartAfterEnd { start, end });
            }
            end.min(total_size.saturating_sub(1))
        };

        if start >= total_size {
            return Err(RangeError::Unsatisfiable {
                start,
                size: total_size,
            });
        }

        Ok(Self {
            start,
            end,
            total_size,
            is_partial: true,
        })
    }

    /// Number of bytes the interval covers.
    pub fn length(&self) -> u64 {
        if self.total_size == 0 {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Value for an outgoing upstream `Range` request header.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// Value for a `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}
