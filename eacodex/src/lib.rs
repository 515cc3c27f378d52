//! # eacodex
//!
//! Decompression engine for the container formats used by EA game assets.
//!
//! Every supported blob is self-describing: a short magic prefix selects the
//! codec and a header field declares the exact decompressed length, so
//! callers can allocate before decoding. Supported formats:
//!
//! - **HUFF**: canonical Huffman coding with an explicit code-length table
//! - **JDLZ**: LZ77 with dual flag streams and near/far match windows
//! - **REF**: RefPack byte-oriented LZ with variable-width commands
//! - **BTREE**: indexed container of stored and compressed sub-blocks
//! - **COMP**: generic wrapper around any of the other formats
//!
//! ## Example
//!
//! ```rust
//! use eacodex::{Format, decompress, detect, query_size};
//!
//! let blob = [0x10, 0xFB, 0x00, 0x00, 0x04, 0xE0, b'A', b'B', b'C', b'D', 0xFC];
//! assert_eq!(detect(&blob), Format::Ref);
//!
//! let mut out = vec![0u8; query_size(&blob).unwrap()];
//! let written = decompress(&blob, &mut out).unwrap();
//! assert_eq!(&out[..written], b"ABCD");
//! ```
//!
//! ## Format Detection
//!
//! [`detect`] classifies a blob from its magic bytes alone and never fails;
//! unrecognized data reads as [`Format::Unknown`]. Detection needs at least
//! [`MIN_DETECT`] bytes.
//!
//! ## Resource Limits
//!
//! Compressed headers are untrusted input. [`Engine::with_limits`] bounds the
//! declared expansion ratio and the nesting depth of wrapped streams; the
//! module-level functions use [`Limits::default`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detect;
pub mod engine;

mod btree;
mod comp;
mod header;
mod huff;
mod jdlz;

#[cfg(feature = "capi")]
mod capi;

// Re-exports
pub use detect::{Format, MIN_DETECT};
pub use eacodex_core::error::{CodexError, Result};
pub use engine::{Engine, Limits, decompress, detect, query_size};
