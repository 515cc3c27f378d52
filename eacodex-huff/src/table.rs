//! Canonical Huffman code table construction and symbol decoding.
//!
//! The HUFF codex stream carries an explicit code-length table and rebuilds
//! the code assignment canonically: at each code length, numerically smaller
//! codes go to numerically smaller symbols. Codewords are read MSB-first, so
//! no bit reversal is involved (unlike DEFLATE's LSB-first packing).

use eacodex_core::BitReader;
use eacodex_core::error::{CodexError, Result};

/// Maximum codeword length accepted by the codex format.
pub const MAX_CODE_LENGTH: usize = 15;

/// A canonical Huffman table for decoding.
///
/// Decoding walks the code lengths in ascending order, extending the
/// candidate code one bit at a time and checking it against the first-code
/// boundary for that length. Symbols are stored sorted by (length, symbol),
/// which is exactly the canonical assignment order.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    /// Symbols sorted by (code length, symbol value).
    symbols: Vec<u16>,
    /// First canonical code of each length.
    first_code: [u32; MAX_CODE_LENGTH + 1],
    /// Number of codes of each length.
    count: [u16; MAX_CODE_LENGTH + 1],
    /// Index into `symbols` where each length's run begins.
    offset: [u16; MAX_CODE_LENGTH + 1],
    /// Longest assigned code length (0 if the table is empty).
    max_length: u8,
}

impl CanonicalTable {
    /// Build a table from per-symbol code lengths.
    ///
    /// `lengths[i]` is the codeword length for symbol `i`; 0 marks an absent
    /// symbol. Over-subscribed tables (more codes than the code space can
    /// hold) are rejected as a header defect. Incomplete tables are accepted;
    /// codewords falling into the unassigned space fail at decode time.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.len() > u16::MAX as usize {
            return Err(CodexError::corrupt_header(format!(
                "code table with {} symbols exceeds supported range",
                lengths.len()
            )));
        }

        let mut count = [0u16; MAX_CODE_LENGTH + 1];
        let mut max_length = 0u8;

        for &len in lengths {
            if len as usize > MAX_CODE_LENGTH {
                return Err(CodexError::corrupt_header(format!(
                    "code length {} exceeds maximum {}",
                    len, MAX_CODE_LENGTH
                )));
            }
            if len > 0 {
                count[len as usize] += 1;
                max_length = max_length.max(len);
            }
        }

        let mut first_code = [0u32; MAX_CODE_LENGTH + 1];
        let mut code = 0u32;
        for bits in 1..=max_length as usize {
            code = (code + u32::from(count[bits - 1])) << 1;
            first_code[bits] = code;
        }

        if max_length > 0 {
            let space = 1u32 << max_length;
            if code + u32::from(count[max_length as usize]) > space {
                return Err(CodexError::corrupt_header(
                    "over-subscribed Huffman code table",
                ));
            }
        }

        let total: u16 = count[1..=max_length as usize].iter().sum();
        let mut offset = [0u16; MAX_CODE_LENGTH + 1];
        let mut next = 0u16;
        for bits in 1..=max_length as usize {
            offset[bits] = next;
            next += count[bits];
        }

        // Canonical order falls out of scanning symbols in ascending order.
        let mut symbols = vec![0u16; total as usize];
        let mut fill = offset;
        for (symbol, &len) in lengths.iter().enumerate() {
            if len > 0 {
                symbols[fill[len as usize] as usize] = symbol as u16;
                fill[len as usize] += 1;
            }
        }

        Ok(Self {
            symbols,
            first_code,
            count,
            offset,
            max_length,
        })
    }

    /// True if no symbol has an assigned code.
    pub fn is_empty(&self) -> bool {
        self.max_length == 0
    }

    /// Decode one symbol from an MSB-first bit stream.
    #[inline]
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0u32;

        for len in 1..=self.max_length as usize {
            code = (code << 1) | u32::from(reader.read_bit()?);

            let n = u32::from(self.count[len]);
            if n > 0 && code.wrapping_sub(self.first_code[len]) < n {
                let idx = self.offset[len] as usize + (code - self.first_code[len]) as usize;
                return Ok(self.symbols[idx]);
            }
        }

        Err(CodexError::corrupt_stream(
            reader.byte_position(),
            "invalid Huffman codeword",
        ))
    }
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

    #[test]
    fn test_canonical_assignment() {
        // Lengths: A=1, B=2, C=2 -> canonical codes A=0, B=10, C=11.
        let table = CanonicalTable::from_lengths(&[1, 2, 2]).unwrap();
        let data = pack_bits(&[(0b0, 1), (0b10, 2), (0b11, 2), (0b0, 1)]);
        let mut reader = BitReader::new(&data);

        assert_eq!(table.decode(&mut reader).unwrap(), 0);
        assert_eq!(table.decode(&mut reader).unwrap(), 1);
        assert_eq!(table.decode(&mut reader).unwrap(), 2);
        assert_eq!(table.decode(&mut reader).unwrap(), 0);
    }

    #[test]
    fn test_lower_symbol_gets_lower_code() {
        // Only symbols 3 and 7 are coded, both at length 2; the smaller
        // symbol takes the smaller code.
        let mut lengths = [0u8; 8];
        lengths[3] = 2;
        lengths[7] = 2;
        let table = CanonicalTable::from_lengths(&lengths).unwrap();

        let data = pack_bits(&[(0b00, 2), (0b01, 2)]);
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 3);
        assert_eq!(table.decode(&mut reader).unwrap(), 7);
    }

    #[test]
    fn test_over_subscribed_rejected() {
        // Three codes of length 1 cannot exist.
        let err = CanonicalTable::from_lengths(&[1, 1, 1]).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_length_above_maximum_rejected() {
        let err = CanonicalTable::from_lengths(&[16]).unwrap_err();
        assert!(matches!(err, CodexError::CorruptHeader { .. }));
    }

    #[test]
    fn test_incomplete_table_undefined_code() {
        // Single symbol of length 2: codes 01, 10, 11 are undefined.
        let table = CanonicalTable::from_lengths(&[2]).unwrap();
        let data = pack_bits(&[(0b11, 2), (0, 6)]);
        let mut reader = BitReader::new(&data);
        let err = table.decode(&mut reader).unwrap_err();
        assert!(matches!(err, CodexError::CorruptStream { .. }));
    }

    #[test]
    fn test_empty_table() {
        let table = CanonicalTable::from_lengths(&[0, 0, 0]).unwrap();
        assert!(table.is_empty());
        let data = [0u8; 1];
        let mut reader = BitReader::new(&data);
        assert!(table.decode(&mut reader).is_err());
    }
}
