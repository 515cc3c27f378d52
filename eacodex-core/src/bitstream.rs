//! MSB-first bit reading over an in-memory payload.
//!
//! The HUFF codex stream packs canonical Huffman codewords most significant
//! bit first, so codes are consumed without bit reversal. The reader borrows
//! the payload slice; exhaustion surfaces as [`CodexError::CorruptStream`]
//! because running out of bits mid-codeword is a payload defect, not an I/O
//! condition.

use crate::error::{CodexError, Result};

/// MSB-first bit reader over a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current byte position.
    byte_pos: usize,
    /// Bit accumulator, filled from the MSB side.
    buffer: u32,
    /// Number of valid bits in the accumulator.
    bits_in_buffer: u8,
    /// Total bits consumed so far.
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Refill the accumulator until it holds at least `count` bits.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        while self.bits_in_buffer < count && self.byte_pos < self.data.len() {
            let byte = self.data[self.byte_pos];
            self.byte_pos += 1;
            self.buffer = (self.buffer << 8) | u32::from(byte);
            self.bits_in_buffer += 8;
        }

        if self.bits_in_buffer < count {
            return Err(CodexError::corrupt_stream(
                self.byte_position(),
                "bit stream exhausted",
            ));
        }

        Ok(())
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u8> {
        Ok(self.read_bits(1)? as u8)
    }

    /// Read up to 16 bits, MSB-first.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!((1..=16).contains(&count), "bit count out of range");
        self.fill_buffer(count)?;

        let shift = self.bits_in_buffer - count;
        let mask = (1u32 << count) - 1;
        let value = (self.buffer >> shift) & mask;

        self.bits_in_buffer -= count;
        self.total_bits_read += u64::from(count);

        Ok(value as u16)
    }

    /// Total bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Byte offset of the read head, rounded up to cover partially
    /// consumed bytes. Used for error reporting.
    pub fn byte_position(&self) -> usize {
        self.total_bits_read.div_ceil(8) as usize
    }
}
