//! RefPack stream decompression.
//!
//! RefPack is the EA house LZ format recognizable by its `0x10FB` packtype.
//! Unlike the four-ASCII-magic containers, the header is self-contained: a
//! big-endian packtype word, optional compressed-length field, and the
//! declared decompressed length, followed by a command stream mixing short,
//! medium and big back-references with literal runs and a mandatory stop
//! command.
//!
//! # Example
//!
//! ```
//! use eacodex_ref::{declared_size, decompress_into};
//!
//! let stream = [0x10, 0xFB, 0x00, 0x00, 0x04, 0xE0, b'A', b'B', b'C', b'D', 0xFC];
//! assert_eq!(declared_size(&stream).unwrap(), 4);
//!
//! let mut out = [0u8; 4];
//! decompress_into(&stream, &mut out).unwrap();
//! assert_eq!(&out, b"ABCD");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;

pub use decode::{RefHeader, declared_size, decompress_into, is_refpack, parse_header};

pub use eacodex_core::error::{CodexError, Result};
