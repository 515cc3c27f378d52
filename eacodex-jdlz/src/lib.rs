//! JDLZ payload decompression.
//!
//! JDLZ is the dual-window LZ scheme used by Need for Speed era containers.
//! Two interleaved flag sequences drive decoding: one selects literal vs
//! match, the other selects between a near window (short distances, long
//! matches) and a far window (long distances, short matches). This crate
//! decodes the raw token stream; the 16-byte container header around it is
//! handled by `eacodex`.
//!
//! # Example
//!
//! ```
//! use eacodex_jdlz::decompress_into;
//!
//! // Flags, three literals, then a distance-3 length-6 match.
//! let payload = [0x08, 0x01, b'a', b'b', b'c', 0x02, 0x03];
//! let mut out = [0u8; 9];
//! let written = decompress_into(&payload, &mut out).unwrap();
//! assert_eq!(&out[..written], b"abcabcabc");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;

pub use decode::decompress_into;

pub use eacodex_core::error::{CodexError, Result};
