//! Shared 16-byte container header used by the HUFF, JDLZ and COMP formats.
//!
//! ```text
//! [0..4)   ASCII magic
//! [4]      version major
//! [5]      version minor
//! [6..8)   reserved
//! [8..12)  u32 LE decompressed length
//! [12..16) u32 LE stream-length field (per-format semantics)
//! ```
//!
//! The stream-length field counts payload bytes for HUFF and total stream
//! bytes (header included) for JDLZ and COMP; each format module validates
//! it against the blob length.

use eacodex_core::error::{CodexError, Result};

/// Size of the fixed container header.
pub(crate) const OUTER_LEN: usize = 16;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OuterHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub decompressed_len: u32,
    pub stream_len: u32,
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Parse the fixed header, checking the expected magic.
///
/// Version bytes are read but not validated; the original writers never
/// check them either.
pub(crate) fn parse_outer(blob: &[u8], magic: &[u8; 4]) -> Result<OuterHeader> {
    if blob.len() < OUTER_LEN {
        return Err(CodexError::truncated(OUTER_LEN, blob.len()));
    }
    if &blob[..4] != magic {
        return Err(CodexError::corrupt_header(format!(
            "container magic {:?} does not match {:?}",
            &blob[..4],
            magic
        )));
    }

    Ok(OuterHeader {
        version_major: blob[4],
        version_minor: blob[5],
        decompressed_len: read_u32_le(blob, 8),
        stream_len: read_u32_le(blob, 12),
    })
}
