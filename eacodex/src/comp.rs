//! COMP composite wrapper.
//!
//! A COMP container wraps one complete tagged stream of any recognized
//! format behind the 16-byte outer header. The wrapped blob is re-entered
//! through the normal detect/size/decode pipeline, one nesting level
//! deeper. The outer header's declared length is authoritative and must
//! agree with whatever the inner stream declares.

use eacodex_core::error::{CodexError, Result};

use crate::engine::{self, Limits};
use crate::header::{self, OUTER_LEN};

pub(crate) const MAGIC: [u8; 4] = *b"COMP";

struct Container {
    declared: u32,
    payload_end: usize,
}

fn parse_container(blob: &[u8]) -> Result<Container> {
    let outer = header::parse_outer(blob, &MAGIC)?;
    let stream_len = outer.stream_len as usize;
    if stream_len < OUTER_LEN || stream_len > blob.len() {
        return Err(CodexError::corrupt_header(format!(
            "stream length field {} inconsistent with {} blob bytes",
            stream_len,
            blob.len()
        )));
    }
    Ok(Container {
        declared: outer.decompressed_len,
        payload_end: stream_len,
    })
}

/// Declared decompressed length from the outer header.
pub(crate) fn query_size(blob: &[u8]) -> Result<u64> {
    Ok(u64::from(parse_container(blob)?.declared))
}

/// Decode the wrapped stream into `out` (sized to the declared length).
pub(crate) fn decompress(
    limits: &Limits,
    blob: &[u8],
    out: &mut [u8],
    depth: usize,
) -> Result<usize> {
    let container = parse_container(blob)?;
    let inner = &blob[OUTER_LEN..container.payload_end];

    let inner_declared = engine::query_size_with(limits, inner)?;
    if inner_declared != out.len() {
        return Err(CodexError::corrupt_header(format!(
            "wrapped stream declares {} bytes, container declares {}",
            inner_declared,
            out.len()
        )));
    }

    engine::dispatch(limits, inner, out, depth + 1)
}
