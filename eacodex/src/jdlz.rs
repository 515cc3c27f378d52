//! JDLZ container handling.
//!
//! A JDLZ container is the 16-byte outer header followed by the token
//! stream (`eacodex-jdlz`). The outer stream-length field counts the whole
//! stream, header included.

use eacodex_core::error::{CodexError, Result};

use crate::header::{self, OUTER_LEN};

pub(crate) const MAGIC: [u8; 4] = *b"JDLZ";

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

/// Decode the token stream into `out` (sized to the declared length).
pub(crate) fn decompress(blob: &[u8], out: &mut [u8]) -> Result<usize> {
    let container = parse_container(blob)?;
    let payload = &blob[OUTER_LEN..container.payload_end];

    let written = eacodex_jdlz::decompress_into(payload, out)?;
    if written != out.len() {
        return Err(CodexError::corrupt_stream(
            payload.len(),
            format!(
                "stream produced {} bytes, header declares {}",
                written,
                out.len()
            ),
        ));
    }
    Ok(written)
}
