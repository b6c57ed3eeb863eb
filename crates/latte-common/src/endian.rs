//! Byte-order selection for binary readers.

/// Byte order of a binary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endian {
    /// Detect byte order from a Unicode-style byte order mark.
    ///
    /// Nintendo container formats store the two bytes `FE FF` for big-endian
    /// files and `FF FE` for little-endian files. Returns `None` for anything
    /// else.
    pub const fn from_bom(bom: [u8; 2]) -> Option<Self> {
        match bom {
            [0xFE, 0xFF] => Some(Endian::Big),
            [0xFF, 0xFE] => Some(Endian::Little),
            _ => None,
        }
    }
}
