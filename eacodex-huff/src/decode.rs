//! Codex stream parsing and decompression.
//!
//! A codex stream is the payload carried by a HUFF container:
//!
//! ```text
//! [0..2)   u16 BE   magic 0x30FB
//! [2..5)   u24 BE   uncompressed length
//! [5]      u8       symbol count (0 means 256)
//! [6..6+N) u8 * N   per-symbol code lengths
//! [6+N..)  bits     MSB-first Huffman codewords
//! ```
//!
//! Stream-level errors report offsets relative to the start of the
//! bit-packed region, not the start of the stream.

use eacodex_core::BitReader;
use eacodex_core::error::{CodexError, Result};

use crate::table::CanonicalTable;

/// Big-endian magic identifying a codex stream.
pub const CODEX_MAGIC: u16 = 0x30FB;

/// Fixed portion of the codex header (magic, length, symbol count).
pub const MIN_HEADER: usize = 6;

/// Parsed fixed header of a codex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodexHeader {
    /// Number of bytes the stream decodes to.
    pub uncompressed_len: u32,
    /// Number of symbols in the code-length table (1..=256).
    pub symbol_count: usize,
    /// Total header length including the code-length table.
    pub header_len: usize,
}

#[inline]
fn read_u24_be(data: &[u8], offset: usize) -> u32 {
    (u32::from(data[offset]) << 16) | (u32::from(data[offset + 1]) << 8) | u32::from(data[offset + 2])
}

/// Check whether `data` starts with the codex stream magic.
pub fn is_codex(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x30 && data[1] == 0xFB
}

/// Parse the fixed header of a codex stream.
pub fn parse_header(data: &[u8]) -> Result<CodexHeader> {
    if data.len() < MIN_HEADER {
        return Err(CodexError::corrupt_header(format!(
            "codex stream header needs {} bytes, got {}",
            MIN_HEADER,
            data.len()
        )));
    }
    if !is_codex(data) {
        return Err(CodexError::corrupt_header("bad codex stream magic"));
    }

    let uncompressed_len = read_u24_be(data, 2);
    let symbol_count = match data[5] {
        0 => 256,
        n => n as usize,
    };
    let header_len = MIN_HEADER + symbol_count;
    if data.len() < header_len {
        return Err(CodexError::corrupt_header(format!(
            "code-length table needs {} bytes, got {}",
            symbol_count,
            data.len() - MIN_HEADER
        )));
    }

    Ok(CodexHeader {
        uncompressed_len,
        symbol_count,
        header_len,
    })
}

/// Return the uncompressed length a codex stream declares.
pub fn declared_size(data: &[u8]) -> Result<u32> {
    Ok(parse_header(data)?.uncompressed_len)
}

/// Decompress a codex stream into `out`, returning the number of bytes
/// written.
///
/// `out` must hold at least the declared uncompressed length; nothing is
/// written otherwise.
pub fn decompress_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let header = parse_header(data)?;
    let ulen = header.uncompressed_len as usize;

    if out.len() < ulen {
        return Err(CodexError::buffer_too_small(ulen, out.len()));
    }

    let lengths = &data[MIN_HEADER..header.header_len];
    let table = CanonicalTable::from_lengths(lengths)?;

    if ulen == 0 {
        return Ok(0);
    }
    if table.is_empty() {
        return Err(CodexError::corrupt_header(
            "empty code table with nonzero output length",
        ));
    }

    let mut reader = BitReader::new(&data[header.header_len..]);
    for slot in out.iter_mut().take(ulen) {
        // Symbol values fit a byte: the table holds at most 256 symbols.
        *slot = table.decode(&mut reader)? as u8;
    }

    Ok(ulen)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack MSB-first bit runs into bytes for test fixtures.
    fn pack_bits(runs: &[(u16, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc = 0u32;
        let mut nbits = 0u8;
        for &(value, width) in runs {
            acc = (acc << width) | u32::from(value);
            nbits += width;
            while nbits >= 8 {
                out.push((acc >> (nbits - 8)) as u8);
                nbits -= 8;
            }
        }
        if nbits > 0 {
            out.push((acc << (8 - nbits)) as u8);
        }
        out
    }

    /// Build a codex stream from code lengths and pre-packed codeword bits.
    fn make_stream(ulen: u32, lengths: &[u8], bits: &[u8]) -> Vec<u8> {
        let mut data = vec![0x30, 0xFB];
        data.push((ulen >> 16) as u8);
        data.push((ulen >> 8) as u8);
        data.push(ulen as u8);
        data.push(if lengths.len() == 256 {
            0
        } else {
            lengths.len() as u8
        });
        data.extend_from_slice(lengths);
        data.extend_from_slice(bits);
        data
    }

    #[test]
    fn test_decompress_simple() {
        // Symbols: 0 -> "0", 1 -> "10", 2 -> "11".
        let bits = pack_bits(&[(0, 1), (0b10, 2), (0b11, 2), (0, 1), (0, 1), (0b10, 2)]);
        let data = make_stream(6, &[1, 2, 2], &bits);

        let mut out = [0xAAu8; 6];
        let written = decompress_into(&data, &mut out).unwrap();
        assert_eq!(written, 6);
        assert_eq!(out, [0, 1, 2, 0, 0, 1]);
    }

    #[test]
    fn test_declared_size() {
        let data = make_stream(6, &[1, 2, 2], &[]);
        assert_eq!(declared_size(&data).unwrap(), 6);
    }

    #[test]
    fn test_zero_length_stream() {
        let data = make_stream(0, &[1], &[]);
        let mut out = [0u8; 0];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 0);
    }

    #[test]
    fn test_symbol_count_zero_means_256() {
        let mut lengths = [0u8; 256];
        lengths[0x41] = 1;
        let bits = pack_bits(&[(0, 1), (0, 1), (0, 1)]);
        let data = make_stream(3, &lengths, &bits);

        let mut out = [0u8; 3];
        decompress_into(&data, &mut out).unwrap();
        assert_eq!(out, [0x41, 0x41, 0x41]);
    }

    #[test]
    fn test_is_codex() {
        assert!(is_codex(&[0x30, 0xFB, 0, 0, 0, 0]));
        assert!(!is_codex(&[0x10, 0xFB, 0, 0, 0, 0]));
        assert!(!is_codex(&[0x30]));
    }

    #[test]
    fn test_header_too_short() {
        let err = parse_header(&[0x30, 0xFB, 0]).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_code_table_truncated() {
        // Claims 4 symbols but carries only 2 length bytes.
        let data = [0x30, 0xFB, 0, 0, 1, 4, 1, 2];
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let bits = pack_bits(&[(0, 1); 6]);
        let data = make_stream(6, &[1, 2, 2], &bits);

        let mut out = [0x5Au8; 4];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CodexError::BufferTooSmall {
                needed: 6,
                available: 4
            }
        ));
        assert_eq!(out, [0x5A; 4]);
    }

    #[test]
    fn test_exhausted_bitstream() {
        // Declares 100 output bytes but carries one byte of codewords.
        let data = make_stream(100, &[1, 2, 2], &[0x00]);
        let mut out = [0u8; 100];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_empty_table_nonzero_length() {
        let data = make_stream(4, &[0, 0, 0], &[0x00]);
        let mut out = [0u8; 4];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_over_subscribed_table() {
        let data = make_stream(4, &[1, 1, 1], &[0x00]);
        let mut out = [0u8; 4];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }
}
