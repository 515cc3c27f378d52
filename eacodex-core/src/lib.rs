//! # eacodex Core
//!
//! Core components shared by the eacodex decoder crates.
//!
//! - [`error`]: the engine-wide error taxonomy
//! - [`bitstream`]: MSB-first bit reading for Huffman codewords
//!
//! ## Architecture
//!
//! eacodex is layered the same way the payload formats are:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Engine                                              │
//! │     detection, headers, BTREE container, COMP wrapper,  │
//! │     facade + C ABI                                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Payload codecs                                      │
//! │     HUFF (canonical Huffman), JDLZ, REF (RefPack)       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     BitReader, CodexError                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole stack is slice-in/slice-out: no I/O, no allocation beyond what
//! a decoder needs for its own tables, no shared mutable state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use error::{CodexError, Result};
