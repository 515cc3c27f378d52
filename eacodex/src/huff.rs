//! HUFF container handling.
//!
//! A HUFF container is the 16-byte outer header followed by a codex stream
//! (`eacodex-huff`). The outer stream-length field counts payload bytes
//! only, and the payload's own 24-bit length must agree with the outer
//! declared length.

use eacodex_core::error::{CodexError, Result};

use crate::header::{self, OUTER_LEN};

pub(crate) const MAGIC: [u8; 4] = *b"HUFF";

struct Container {
    declared: u32,
    payload_end: usize,
}

fn parse_container(blob: &[u8]) -> Result<Container> {
    let outer = header::parse_outer(blob, &MAGIC)?;
    let stream_len = outer.stream_len as usize;
    if stream_len > blob.len() - OUTER_LEN {
        return Err(CodexError::corrupt_header(format!(
            "stream length field {} exceeds {} payload bytes",
            stream_len,
            blob.len() - OUTER_LEN
        )));
    }
    Ok(Container {
        declared: outer.decompressed_len,
        payload_end: OUTER_LEN + stream_len,
    })
}

/// Declared decompressed length from the outer header.
pub(crate) fn query_size(blob: &[u8]) -> Result<u64> {
    Ok(u64::from(parse_container(blob)?.declared))
}

/// Decode the codex payload into `out` (sized to the declared length).
pub(crate) fn decompress(blob: &[u8], out: &mut [u8]) -> Result<usize> {
    let container = parse_container(blob)?;
    let payload = &blob[OUTER_LEN..container.payload_end];

    let inner = eacodex_huff::parse_header(payload)?;
    if inner.uncompressed_len != container.declared {
        return Err(CodexError::corrupt_header(format!(
            "payload declares {} bytes, container declares {}",
            inner.uncompressed_len, container.declared
        )));
    }

    eacodex_huff::decompress_into(payload, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(payload: &[u8], declared: u32) -> Vec<u8> {
        let mut blob = Vec::with_capacity(OUTER_LEN + payload.len());
        blob.extend_from_slice(&MAGIC);
        blob.extend_from_slice(&[0x01, 0x10, 0x00, 0x00]);
        blob.extend_from_slice(&declared.to_le_bytes());
        blob.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        blob.extend_from_slice(payload);
        blob
    }

    /// Codex stream emitting `declared` copies of symbol 0x41.
    fn aaa_payload(declared: u32) -> Vec<u8> {
        let mut payload = vec![0x30, 0xFB];
        payload.extend_from_slice(&[
            (declared >> 16) as u8,
            (declared >> 8) as u8,
            declared as u8,
        ]);
        payload.push(66);
        let mut lengths = [0u8; 66];
        lengths[0x41] = 1;
        payload.extend_from_slice(&lengths);
        payload.extend(std::iter::repeat_n(0u8, (declared as usize).div_ceil(8)));
        payload
    }

    #[test]
    fn test_query_size() {
        let blob = wrap(&aaa_payload(5), 5);
        assert_eq!(query_size(&blob).unwrap(), 5);
    }

    #[test]
    fn test_decompress() {
        let blob = wrap(&aaa_payload(5), 5);
        let mut out = [0u8; 5];
        assert_eq!(decompress(&blob, &mut out).unwrap(), 5);
        assert_eq!(&out, b"AAAAA");
    }

    #[test]
    fn test_stream_length_exceeds_blob() {
        let mut blob = wrap(&aaa_payload(5), 5);
        blob[12] = 0xFF;
        let err = query_size(&blob).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_inner_outer_length_mismatch() {
        let blob = wrap(&aaa_payload(5), 6);
        let mut out = [0u8; 6];
        let err = decompress(&blob, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_payload_not_codex() {
        let blob = wrap(b"not a codex stream", 5);
        let mut out = [0u8; 5];
        let err = decompress(&blob, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_truncated_outer() {
        let err = query_size(b"HUFF\x01\x10").unwrap_err();
        assert!(matches!(err, CodexError::TruncatedHeader { .. }));
    }
}
