//! Error types for eacodex operations.
//!
//! Every failure the engine can produce maps to exactly one variant here.
//! Errors are local to a single call: the engine never retries internally
//! and never panics on malformed input.

use thiserror::Error;

/// The main error type for eacodex operations.
#[derive(Debug, Error)]
pub enum CodexError {
    /// Input did not match any known format signature, or the caller asked
    /// to process a format the engine declines.
    #[error("unsupported or unrecognized compression format")]
    UnsupportedFormat,

    /// Fewer bytes than the format's minimum header size.
    #[error("truncated header: need {needed} bytes, have {available}")]
    TruncatedHeader {
        /// Number of header bytes the format requires.
        needed: usize,
        /// Number of bytes actually available.
        available: usize,
    },

    /// Header fields are internally inconsistent or out of sane range.
    #[error("corrupt header: {message}")]
    CorruptHeader {
        /// Description of the inconsistency.
        message: String,
    },

    /// Payload bytes do not decode to a valid token/codeword sequence, or
    /// the stream ended before producing the declared output length.
    #[error("corrupt stream at offset {offset}: {message}")]
    CorruptStream {
        /// Byte offset into the payload where decoding failed.
        offset: usize,
        /// Description of the failure.
        message: String,
    },

    /// Caller-supplied output buffer is smaller than the declared length.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Declared decompressed length.
        needed: usize,
        /// Capacity of the supplied buffer.
        available: usize,
    },

    /// Composite nesting exceeded the configured maximum depth.
    #[error("nesting depth {depth} exceeds configured maximum {max}")]
    UnsupportedNesting {
        /// Depth the input asked for.
        depth: usize,
        /// Configured ceiling.
        max: usize,
    },
}

/// Result type alias for eacodex operations.
pub type Result<T> = std::result::Result<T, CodexError>;

impl CodexError {
    /// Create a truncated header error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::TruncatedHeader { needed, available }
    }

    /// Create a corrupt header error.
    pub fn corrupt_header(message: impl Into<String>) -> Self {
        Self::CorruptHeader {
            message: message.into(),
        }
    }

    /// Create a corrupt stream error.
    pub fn corrupt_stream(offset: usize, message: impl Into<String>) -> Self {
        Self::CorruptStream {
            offset,
            message: message.into(),
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an unsupported nesting error.
    pub fn nesting(depth: usize, max: usize) -> Self {
        Self::UnsupportedNesting { depth, max }
    }
}
