//! RefPack header parsing and command-stream decompression.
//!
//! A RefPack stream opens with a 2-byte big-endian packtype. Bit 0x8000
//! widens the size fields from 3 to 4 bytes; bit 0x0100 inserts a compressed
//! length ahead of the decompressed length (skipped here). The decompressed
//! length is followed directly by the command stream.
//!
//! Commands carry 0..=3 prefix literals plus a back-reference, except the
//! two single-byte forms: a plain literal run and the stop command. The
//! stream must end with a stop command, at exactly the declared length.

use eacodex_core::error::{CodexError, Result};

/// Packtype mask: bits 0x8000, 0x4000 and 0x0100 are header flags.
const PACKTYPE_MASK: u16 = 0x3EFF;

/// Canonical RefPack packtype after masking.
const PACKTYPE: u16 = 0x10FB;

/// Parsed RefPack header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefHeader {
    /// Raw packtype word.
    pub packtype: u16,
    /// Number of bytes the stream decodes to.
    pub uncompressed_len: u32,
    /// Offset of the first command byte.
    pub header_len: usize,
}

#[inline]
fn read_be(data: &[u8], offset: usize, width: usize) -> u32 {
    let mut value = 0u32;
    for &byte in &data[offset..offset + width] {
        value = (value << 8) | u32::from(byte);
    }
    value
}

/// Check whether `data` starts with a RefPack packtype.
pub fn is_refpack(data: &[u8]) -> bool {
    if data.len() < 2 {
        return false;
    }
    let packtype = u16::from_be_bytes([data[0], data[1]]);
    packtype & PACKTYPE_MASK == PACKTYPE
}

/// Parse a RefPack header, returning the declared length and the offset of
/// the command stream.
pub fn parse_header(data: &[u8]) -> Result<RefHeader> {
    if data.len() < 2 {
        return Err(CodexError::truncated(2, data.len()));
    }
    let packtype = u16::from_be_bytes([data[0], data[1]]);
    if packtype & PACKTYPE_MASK != PACKTYPE {
        return Err(CodexError::corrupt_header(format!(
            "bad RefPack packtype 0x{:04X}",
            packtype
        )));
    }

    let size_width = if packtype & 0x8000 != 0 { 4 } else { 3 };
    let mut pos = 2;
    if packtype & 0x0100 != 0 {
        // Compressed-length field: present but unused.
        pos += size_width;
    }
    let header_len = pos + size_width;
    if data.len() < header_len {
        return Err(CodexError::truncated(header_len, data.len()));
    }

    Ok(RefHeader {
        packtype,
        uncompressed_len: read_be(data, pos, size_width),
        header_len,
    })
}

/// Return the decompressed length a RefPack stream declares.
pub fn declared_size(data: &[u8]) -> Result<u32> {
    Ok(parse_header(data)?.uncompressed_len)
}

struct RefDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    out_pos: usize,
    declared: usize,
}

impl<'a> RefDecoder<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.input.len() {
            return Err(CodexError::corrupt_stream(self.pos, "command truncated"));
        }
        let bytes = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn literals(&mut self, out: &mut [u8], count: usize) -> Result<()> {
        if self.pos + count > self.input.len() {
            return Err(CodexError::corrupt_stream(self.pos, "literal run truncated"));
        }
        if self.out_pos + count > self.declared {
            return Err(CodexError::corrupt_stream(
                self.pos,
                "output exceeds declared length",
            ));
        }
        out[self.out_pos..self.out_pos + count]
            .copy_from_slice(&self.input[self.pos..self.pos + count]);
        self.pos += count;
        self.out_pos += count;
        Ok(())
    }

    fn copy(&mut self, out: &mut [u8], distance: usize, length: usize) -> Result<()> {
        if distance > self.out_pos {
            return Err(CodexError::corrupt_stream(
                self.pos,
                format!(
                    "match distance {} exceeds {} bytes produced",
                    distance, self.out_pos
                ),
            ));
        }
        if self.out_pos + length > self.declared {
            return Err(CodexError::corrupt_stream(
                self.pos,
                "output exceeds declared length",
            ));
        }
        // Overlap-safe byte-by-byte copy.
        for i in 0..length {
            out[self.out_pos + i] = out[self.out_pos + i - distance];
        }
        self.out_pos += length;
        Ok(())
    }
}

/// Decompress a RefPack stream (header included) into `out`, returning the
/// number of bytes written.
///
/// `out` must hold at least the declared decompressed length; nothing is
/// written otherwise. The command stream must terminate with a stop command
/// having produced exactly the declared length.
pub fn decompress_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    let header = parse_header(data)?;
    let declared = header.uncompressed_len as usize;

    if out.len() < declared {
        return Err(CodexError::buffer_too_small(declared, out.len()));
    }

    let mut dec = RefDecoder {
        input: data,
        pos: header.header_len,
        out_pos: 0,
        declared,
    };

    loop {
        if dec.pos >= data.len() {
            return Err(CodexError::corrupt_stream(
                dec.pos,
                "stream ended before stop command",
            ));
        }
        let c = data[dec.pos];

        if c < 0x80 {
            let cmd = dec.take(2)?;
            let literals = usize::from(c & 0x03);
            let length = usize::from((c & 0x1C) >> 2) + 3;
            let distance = (usize::from(c & 0x60) << 3) + usize::from(cmd[1]) + 1;
            dec.literals(out, literals)?;
            dec.copy(out, distance, length)?;
        } else if c < 0xC0 {
            let cmd = dec.take(3)?;
            let literals = usize::from(cmd[1] >> 6);
            let length = usize::from(c & 0x3F) + 4;
            let distance = (usize::from(cmd[1] & 0x3F) << 8) + usize::from(cmd[2]) + 1;
            dec.literals(out, literals)?;
            dec.copy(out, distance, length)?;
        } else if c < 0xE0 {
            let cmd = dec.take(4)?;
            let literals = usize::from(c & 0x03);
            let length = (usize::from(c & 0x0C) << 6) + usize::from(cmd[3]) + 5;
            let distance = (usize::from(c & 0x10) << 12)
                + (usize::from(cmd[1]) << 8)
                + usize::from(cmd[2])
                + 1;
            dec.literals(out, literals)?;
            dec.copy(out, distance, length)?;
        } else if c < 0xFC {
            dec.take(1)?;
            let literals = (usize::from(c & 0x1F) << 2) + 4;
            dec.literals(out, literals)?;
        } else {
            dec.take(1)?;
            let literals = usize::from(c & 0x03);
            dec.literals(out, literals)?;
            break;
        }
    }

    if dec.out_pos != declared {
        return Err(CodexError::corrupt_stream(
            dec.pos,
            format!(
                "stream produced {} bytes, header declares {}",
                dec.out_pos, declared
            ),
        ));
    }
    Ok(dec.out_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(declared: u32) -> Vec<u8> {
        vec![
            0x10,
            0xFB,
            (declared >> 16) as u8,
            (declared >> 8) as u8,
            declared as u8,
        ]
    }

    #[test]
    fn test_literal_run_and_stop() {
        let mut data = header(4);
        data.extend_from_slice(&[0xE0, b'A', b'B', b'C', b'D', 0xFC]);

        let mut out = [0u8; 4];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 4);
        assert_eq!(&out, b"ABCD");
    }

    #[test]
    fn test_stop_trailing_literals() {
        let mut data = header(2);
        data.extend_from_slice(&[0xFE, b'h', b'i']);

        let mut out = [0u8; 2];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 2);
        assert_eq!(&out, b"hi");
    }

    #[test]
    fn test_short_copy_overlap() {
        // 3 literals "abc", then a distance-3 length-6 copy.
        let mut data = header(9);
        data.extend_from_slice(&[0x0F, 0x02, b'a', b'b', b'c', 0xFC]);

        let mut out = [0u8; 9];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 9);
        assert_eq!(&out, b"abcabcabc");
    }

    #[test]
    fn test_medium_copy() {
        // 304 literals, then a distance-300 length-10 copy.
        let mut data = header(314);
        let fill: Vec<u8> = (0..304u32).map(|i| (i % 251) as u8).collect();
        data.push(0xFB);
        data.extend_from_slice(&fill[..112]);
        data.push(0xFB);
        data.extend_from_slice(&fill[112..224]);
        data.push(0xF3);
        data.extend_from_slice(&fill[224..304]);
        data.extend_from_slice(&[0x86, 0x01, 0x2B, 0xFC]);

        let mut out = [0u8; 314];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 314);
        assert_eq!(&out[..304], &fill[..]);
        assert_eq!(&out[304..314], &fill[4..14]);
    }

    #[test]
    fn test_big_copy() {
        // 4 literals, then a distance-1 length-600 copy.
        let mut data = header(604);
        data.extend_from_slice(&[0xE0, b'x', b'x', b'x', b'x']);
        data.extend_from_slice(&[0xC8, 0x00, 0x00, 0x53, 0xFC]);

        let mut out = [0u8; 604];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 604);
        assert!(out.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_wide_size_header() {
        // 0x8000 flag: 4-byte size fields.
        let data = [0x90, 0xFB, 0x00, 0x00, 0x00, 0x02, 0xFE, b'o', b'k'];
        assert_eq!(declared_size(&data).unwrap(), 2);

        let mut out = [0u8; 2];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 2);
        assert_eq!(&out, b"ok");
    }

    #[test]
    fn test_compressed_size_field_skipped() {
        // 0x0100 flag: a compressed-length field precedes the size.
        let data = [
            0x11, 0xFB, 0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x02, 0xFE, b'o', b'k',
        ];
        assert_eq!(declared_size(&data).unwrap(), 2);

        let mut out = [0u8; 2];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 2);
        assert_eq!(&out, b"ok");
    }

    #[test]
    fn test_is_refpack() {
        assert!(is_refpack(&[0x10, 0xFB]));
        assert!(is_refpack(&[0x90, 0xFB]));
        assert!(is_refpack(&[0x11, 0xFB]));
        assert!(!is_refpack(&[0x46, 0xFB]));
        assert!(!is_refpack(&[0x10, 0xFA]));
        assert!(!is_refpack(&[0x10]));
    }

    #[test]
    fn test_truncated_header() {
        let err = parse_header(&[0x10]).unwrap_err();
        assert!(matches!(err, CodexError::TruncatedHeader { .. }));

        let err = parse_header(&[0x10, 0xFB, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            CodexError::TruncatedHeader {
                needed: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_missing_stop() {
        let mut data = header(4);
        data.extend_from_slice(&[0xE0, b'A', b'B', b'C', b'D']);

        let mut out = [0u8; 4];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_stop_short_of_declared() {
        let mut data = header(10);
        data.extend_from_slice(&[0xE0, b'A', b'B', b'C', b'D', 0xFC]);

        let mut out = [0u8; 10];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_output_exceeds_declared() {
        let mut data = header(2);
        data.extend_from_slice(&[0xE0, b'A', b'B', b'C', b'D', 0xFC]);

        let mut out = [0u8; 8];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_distance_exceeds_output() {
        // Copy before any literal was produced.
        let mut data = header(3);
        data.extend_from_slice(&[0x00, 0x00, 0xFC]);

        let mut out = [0u8; 3];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let mut data = header(4);
        data.extend_from_slice(&[0xE0, b'A', b'B', b'C', b'D', 0xFC]);

        let mut out = [0x77u8; 2];
        let err = decompress_into(&data, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CodexError::BufferTooSmall {
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(out, [0x77; 2]);
    }

    #[test]
    fn test_empty_stream() {
        let mut data = header(0);
        data.push(0xFC);

        let mut out = [0u8; 0];
        assert_eq!(decompress_into(&data, &mut out).unwrap(), 0);
    }
}
