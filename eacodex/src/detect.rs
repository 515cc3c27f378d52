//! Container format auto-detection.
//!
//! This module classifies a blob by magic bytes (file signatures). The
//! four-ASCII-magic containers are checked before the 2-byte packtype
//! formats so that a wrapper is never mistaken for its payload.

use crate::btree;

/// Known container formats, with their stable wire codes.
///
/// The numeric codes are part of the C surface and must not change:
/// HUFF = 0, JDLZ = 1, REF = 2, BTREE = 3, COMP = 4, unknown = -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Canonical-Huffman container ("HUFF").
    Huff,
    /// Dual-window LZ container ("JDLZ").
    Jdlz,
    /// RefPack command stream (0x10FB packtype).
    Ref,
    /// Indexed sub-block container (0x46FB/0x47FB packtype).
    Btree,
    /// Composite wrapper around another recognized stream ("COMP").
    Comp,
    /// Unrecognized data.
    Unknown,
}

/// Smallest prefix any format can be detected from: the packtype formats
/// need their 2-byte signature plus a 3-byte length field.
pub const MIN_DETECT: usize = 5;

impl Format {
    /// Detect format from magic bytes.
    ///
    /// Inputs shorter than [`MIN_DETECT`] are `Unknown` without probing.
    /// Detection never fails.
    pub fn from_magic(data: &[u8]) -> Self {
        if data.len() < MIN_DETECT {
            return Self::Unknown;
        }

        match &data[..4] {
            b"JDLZ" => return Self::Jdlz,
            b"HUFF" => return Self::Huff,
            b"COMP" => return Self::Comp,
            _ => {}
        }

        if eacodex_ref::is_refpack(data) {
            return Self::Ref;
        }

        if btree::is_btree(data) {
            return Self::Btree;
        }

        Self::Unknown
    }

    /// Stable wire code for the C surface.
    pub const fn code(self) -> i32 {
        match self {
            Self::Huff => 0,
            Self::Jdlz => 1,
            Self::Ref => 2,
            Self::Btree => 3,
            Self::Comp => 4,
            Self::Unknown => -1,
        }
    }

    /// Format for a wire code; anything out of range is `Unknown`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Huff,
            1 => Self::Jdlz,
            2 => Self::Ref,
            3 => Self::Btree,
            4 => Self::Comp,
            _ => Self::Unknown,
        }
    }

    /// Conventional name of the format.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Huff => "HUFF",
            Self::Jdlz => "JDLZ",
            Self::Ref => "REF",
            Self::Btree => "BTREE",
            Self::Comp => "COMP",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
