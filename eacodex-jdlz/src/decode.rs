//! JDLZ token stream decompression.
//!
//! The stream interleaves two flag sequences with literals and match tokens.
//! Flag bytes are consumed inline: whenever a flag register runs dry, the
//! next input byte refills it. `flags1` picks literal vs match; on a match,
//! `flags2` picks the token encoding:
//!
//! - near window: distances 1..=16, lengths 3..=4098
//! - far window: distances 17..=2064, lengths 3..=34
//!
//! Matches may overlap their own output (distance 1 repeats the last byte).
//! Error offsets are relative to the start of the payload.

use eacodex_core::error::{CodexError, Result};

/// Decompress a JDLZ payload into `out`, returning the number of bytes
/// written.
///
/// Decoding stops when `out` is full or the payload is exhausted, whichever
/// comes first; a match running past the end of `out` is clamped. Callers
/// that know the expected output length should pass a slice of exactly that
/// length and treat a short return as corruption.
pub fn decompress_into(payload: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut flags1: u16 = 1;
    let mut flags2: u16 = 1;
    let mut pos = 0;
    let mut out_pos = 0;

    while pos < payload.len() && out_pos < out.len() {
        if flags1 == 1 {
            flags1 = u16::from(payload[pos]) | 0x100;
            pos += 1;
        }
        if flags2 == 1 {
            if pos >= payload.len() {
                return Err(CodexError::corrupt_stream(pos, "flag byte missing"));
            }
            flags2 = u16::from(payload[pos]) | 0x100;
            pos += 1;
        }

        if flags1 & 1 != 0 {
            if pos + 2 > payload.len() {
                return Err(CodexError::corrupt_stream(pos, "match token truncated"));
            }
            let b0 = payload[pos];
            let b1 = payload[pos + 1];
            pos += 2;

            let (distance, length) = if flags2 & 1 != 0 {
                (
                    usize::from(b0 & 0x0F) + 1,
                    (usize::from(b1) | (usize::from(b0 & 0xF0) << 4)) + 3,
                )
            } else {
                (
                    (usize::from(b1) | (usize::from(b0 & 0xE0) << 3)) + 17,
                    usize::from(b0 & 0x1F) + 3,
                )
            };

            if distance > out_pos {
                return Err(CodexError::corrupt_stream(
                    pos - 2,
                    format!(
                        "match distance {} exceeds {} bytes produced",
                        distance, out_pos
                    ),
                ));
            }

            // Overlapping copies are the point: copy byte by byte. The final
            // match is clamped at the end of the output buffer.
            let copy_len = length.min(out.len() - out_pos);
            for i in 0..copy_len {
                out[out_pos + i] = out[out_pos + i - distance];
            }
            out_pos += copy_len;
            flags2 >>= 1;
        } else {
            if pos >= payload.len() {
                return Err(CodexError::corrupt_stream(pos, "literal byte missing"));
            }
            out[out_pos] = payload[pos];
            out_pos += 1;
            pos += 1;
        }
        flags1 >>= 1;
    }

    Ok(out_pos)
}
