//! BTREE indexed sub-block container.
//!
//! A BTREE blob stores many independently-decodable chunks behind an index:
//!
//! ```text
//! [0..2)  u16 BE  packtype 0x46FB or 0x47FB
//! [2..5)  u24 BE  total decompressed length
//! [5..7)  u16 BE  entry count n
//! [7..)   13-byte index entries, then sub-block data
//! ```
//!
//! Each entry names a method byte (0 = stored, 1 = coded), a destination
//! range in the output and a source range in the blob. Stored sub-blocks are
//! copied verbatim; coded sub-blocks are complete tagged streams decoded by
//! re-entering the pipeline, which consumes nesting depth like a COMP
//! wrapper. The index must tile the output exactly, and source ranges must
//! be disjoint and live past the index region.

use eacodex_core::error::{CodexError, Result};

use crate::engine::{self, Limits};

/// Fixed header: packtype, total length, entry count.
pub(crate) const FIXED_LEN: usize = 7;

const ENTRY_LEN: usize = 13;

const METHOD_STORED: u8 = 0;
const METHOD_CODED: u8 = 1;

/// Check whether `data` starts with one of the BTREE packtypes.
///
/// Writers emit either 0x46FB or 0x47FB; the layout is the same under both.
pub(crate) fn is_btree(data: &[u8]) -> bool {
    data.len() >= 2 && (data[0] == 0x46 || data[0] == 0x47) && data[1] == 0xFB
}

#[inline]
fn read_u24_be(data: &[u8], offset: usize) -> u32 {
    (u32::from(data[offset]) << 16)
        | (u32::from(data[offset + 1]) << 8)
        | u32::from(data[offset + 2])
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BtreeHeader {
    pub total_len: u32,
    pub entry_count: usize,
    /// Offset of the first byte past the index table.
    pub index_end: usize,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    method: u8,
    dst_off: usize,
    dst_len: usize,
    src_off: usize,
    src_len: usize,
}

pub(crate) fn parse_header(blob: &[u8]) -> Result<BtreeHeader> {
    if blob.len() < FIXED_LEN {
        return Err(CodexError::truncated(FIXED_LEN, blob.len()));
    }
    if !is_btree(blob) {
        return Err(CodexError::corrupt_header(format!(
            "bad BTREE packtype 0x{:02X}{:02X}",
            blob[0], blob[1]
        )));
    }

    let total_len = read_u24_be(blob, 2);
    let entry_count = usize::from(u16::from_be_bytes([blob[5], blob[6]]));
    let index_end = FIXED_LEN + entry_count * ENTRY_LEN;
    if blob.len() < index_end {
        return Err(CodexError::corrupt_header(format!(
            "index table needs {} bytes, got {}",
            index_end - FIXED_LEN,
            blob.len() - FIXED_LEN
        )));
    }

    Ok(BtreeHeader {
        total_len,
        entry_count,
        index_end,
    })
}

/// Declared total length from the fixed header.
pub(crate) fn query_size(blob: &[u8]) -> Result<u64> {
    Ok(u64::from(parse_header(blob)?.total_len))
}

/// Parse and structurally validate the index.
fn parse_entries(blob: &[u8], header: &BtreeHeader) -> Result<Vec<Entry>> {
    let total = header.total_len as usize;
    let mut entries = Vec::with_capacity(header.entry_count);
    let mut expected_dst = 0usize;

    for i in 0..header.entry_count {
        let base = FIXED_LEN + i * ENTRY_LEN;
        let entry = Entry {
            method: blob[base],
            dst_off: read_u24_be(blob, base + 1) as usize,
            dst_len: read_u24_be(blob, base + 4) as usize,
            src_off: read_u24_be(blob, base + 7) as usize,
            src_len: read_u24_be(blob, base + 10) as usize,
        };

        if entry.method > METHOD_CODED {
            return Err(CodexError::corrupt_header(format!(
                "entry {} has unknown method {}",
                i, entry.method
            )));
        }
        if entry.dst_len == 0 || entry.src_len == 0 {
            return Err(CodexError::corrupt_header(format!("entry {} is empty", i)));
        }
        if entry.dst_off != expected_dst {
            return Err(CodexError::corrupt_header(format!(
                "entry {} at output offset {} does not tile the output (expected {})",
                i, entry.dst_off, expected_dst
            )));
        }
        expected_dst += entry.dst_len;

        if entry.src_off < header.index_end || entry.src_off + entry.src_len > blob.len() {
            return Err(CodexError::corrupt_header(format!(
                "entry {} source range {}..{} outside sub-block region {}..{}",
                i,
                entry.src_off,
                entry.src_off + entry.src_len,
                header.index_end,
                blob.len()
            )));
        }
        if entry.method == METHOD_STORED && entry.src_len != entry.dst_len {
            return Err(CodexError::corrupt_header(format!(
                "entry {} stores {} source bytes for {} output bytes",
                i, entry.src_len, entry.dst_len
            )));
        }

        entries.push(entry);
    }

    if expected_dst != total {
        return Err(CodexError::corrupt_header(format!(
            "index covers {} bytes, header declares {}",
            expected_dst, total
        )));
    }

    let mut spans: Vec<(usize, usize)> = entries.iter().map(|e| (e.src_off, e.src_len)).collect();
    spans.sort_unstable();
    for pair in spans.windows(2) {
        if pair[0].0 + pair[0].1 > pair[1].0 {
            return Err(CodexError::corrupt_header(format!(
                "source ranges {}..{} and {}..{} overlap",
                pair[0].0,
                pair[0].0 + pair[0].1,
                pair[1].0,
                pair[1].0 + pair[1].1
            )));
        }
    }

    Ok(entries)
}

/// Decode every indexed sub-block into `out` (sized to the total length).
pub(crate) fn decompress(
    limits: &Limits,
    blob: &[u8],
    out: &mut [u8],
    depth: usize,
) -> Result<usize> {
    let header = parse_header(blob)?;
    let entries = parse_entries(blob, &header)?;

    for entry in &entries {
        let src = &blob[entry.src_off..entry.src_off + entry.src_len];
        let dst = &mut out[entry.dst_off..entry.dst_off + entry.dst_len];
        match entry.method {
            METHOD_STORED => dst.copy_from_slice(src),
            _ => {
                let sub_declared = engine::query_size_with(limits, src)?;
                if sub_declared != dst.len() {
                    return Err(CodexError::corrupt_header(format!(
                        "sub-block declares {} bytes, index entry expects {}",
                        sub_declared,
                        dst.len()
                    )));
                }
                engine::dispatch(limits, src, dst, depth + 1)?;
            }
        }
    }

    Ok(out.len())
}
