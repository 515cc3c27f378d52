//! HUFF codex stream decompression.
//!
//! Implements the canonical-Huffman payload format used by HUFF containers:
//! a small header (magic `0x30FB`, 24-bit uncompressed length, symbol count)
//! followed by a per-symbol code-length table and an MSB-first bit stream of
//! codewords. Code assignment is canonical, so the table alone fully
//! determines the codes.
//!
//! # Example
//!
//! ```
//! use eacodex_huff::{declared_size, decompress_into};
//!
//! // Magic, length 3, a 66-entry table giving 'A' a 1-bit code, then three
//! // codewords (all zero bits).
//! let mut stream = vec![0x30, 0xFB, 0x00, 0x00, 0x03, 66];
//! let mut lengths = [0u8; 66];
//! lengths[b'A' as usize] = 1;
//! stream.extend_from_slice(&lengths);
//! stream.push(0x00);
//!
//! assert_eq!(declared_size(&stream).unwrap(), 3);
//!
//! let mut out = [0u8; 3];
//! decompress_into(&stream, &mut out).unwrap();
//! assert_eq!(&out, b"AAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod table;

pub use decode::{
    CODEX_MAGIC, CodexHeader, MIN_HEADER, declared_size, decompress_into, is_codex, parse_header,
};
pub use table::{CanonicalTable, MAX_CODE_LENGTH};

pub use eacodex_core::error::{CodexError, Result};
