//! Engine facade: detection, size query and decompression behind one entry
//! point, with defensive limits applied while parsing headers.

use eacodex_core::error::{CodexError, Result};

use crate::detect::Format;
use crate::{btree, comp, huff, jdlz};

/// Defensive resource bounds.
///
/// Header fields are attacker-controlled; these bounds reject blobs whose
/// declared sizes or nesting could not come from a well-formed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth across COMP wrappers and BTREE coded
    /// sub-blocks. A top-level call starts at depth 0.
    pub max_depth: usize,
    /// Maximum ratio of declared decompressed length to input length.
    pub max_expansion: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_expansion: 1_000_000,
        }
    }
}

/// Stateless decompression engine.
///
/// The engine holds only its [`Limits`]; all three operations are pure
/// functions of their inputs and are safe to call concurrently on
/// independent buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    limits: Limits,
}

impl Engine {
    /// Engine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// The limits this engine applies.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Classify a blob by signature. Never fails; unrecognized data is
    /// [`Format::Unknown`].
    pub fn detect(&self, blob: &[u8]) -> Format {
        Format::from_magic(blob)
    }

    /// Declared decompressed length, computed from the header alone.
    pub fn query_size(&self, blob: &[u8]) -> Result<usize> {
        query_size_with(&self.limits, blob)
    }

    /// Decompress a blob into `out`.
    ///
    /// `out` may be larger than needed; on success exactly the declared
    /// length was written and is returned. On error nothing useful was
    /// written; [`CodexError::BufferTooSmall`] in particular is raised
    /// before any decoder touches `out`.
    pub fn decompress(&self, blob: &[u8], out: &mut [u8]) -> Result<usize> {
        dispatch(&self.limits, blob, out, 0)
    }
}

/// Classify a blob with a default-limits engine.
pub fn detect(blob: &[u8]) -> Format {
    Engine::default().detect(blob)
}

/// Query the declared decompressed length with a default-limits engine.
pub fn query_size(blob: &[u8]) -> Result<usize> {
    Engine::default().query_size(blob)
}

/// Decompress with a default-limits engine.
pub fn decompress(blob: &[u8], out: &mut [u8]) -> Result<usize> {
    Engine::default().decompress(blob, out)
}

/// Validate a declared length against the size bounds.
fn check_declared(limits: &Limits, declared: u64, input_len: usize) -> Result<usize> {
    if declared > i32::MAX as u64 {
        return Err(CodexError::corrupt_header(format!(
            "declared length {} exceeds supported range",
            declared
        )));
    }
    if declared > limits.max_expansion.saturating_mul(input_len as u64) {
        return Err(CodexError::corrupt_header(format!(
            "declared length {} exceeds expansion bound for {} input bytes",
            declared, input_len
        )));
    }
    Ok(declared as usize)
}

pub(crate) fn query_size_with(limits: &Limits, blob: &[u8]) -> Result<usize> {
    let declared = match Format::from_magic(blob) {
        Format::Huff => huff::query_size(blob)?,
        Format::Jdlz => jdlz::query_size(blob)?,
        Format::Ref => u64::from(eacodex_ref::declared_size(blob)?),
        Format::Btree => btree::query_size(blob)?,
        Format::Comp => comp::query_size(blob)?,
        Format::Unknown => return Err(CodexError::UnsupportedFormat),
    };
    check_declared(limits, declared, blob.len())
}

pub(crate) fn dispatch(
    limits: &Limits,
    blob: &[u8],
    out: &mut [u8],
    depth: usize,
) -> Result<usize> {
    if depth > limits.max_depth {
        return Err(CodexError::nesting(depth, limits.max_depth));
    }

    let format = Format::from_magic(blob);
    let declared = query_size_with(limits, blob)?;
    if out.len() < declared {
        return Err(CodexError::buffer_too_small(declared, out.len()));
    }
    let target = &mut out[..declared];

    match format {
        Format::Huff => huff::decompress(blob, target),
        Format::Jdlz => jdlz::decompress(blob, target),
        Format::Ref => eacodex_ref::decompress_into(blob, target),
        Format::Btree => btree::decompress(limits, blob, target, depth),
        Format::Comp => comp::decompress(limits, blob, target, depth),
        Format::Unknown => Err(CodexError::UnsupportedFormat),
    }
}
