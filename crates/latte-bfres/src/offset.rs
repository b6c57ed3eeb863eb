//! Self-relative file offsets.
//!
//! BFRES pointers are stored relative to their own position: the target of an
//! offset field at address `a` holding value `v` is `a + v`, with `v` read as
//! a signed 32-bit integer so references can point backwards. A stored zero
//! means the reference is absent.

use latte_common::BinaryReader;

use crate::{Error, Result};

/// A self-relative offset as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    base: u64,
    value: i32,
}

impl Offset {
    /// Read an offset field at the reader's current position.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let base = reader.position() as u64;
        let value = reader.read_i32()?;
        Ok(Self { base, value })
    }

    /// The address the offset field itself was read from.
    #[inline]
    pub fn base(self) -> u64 {
        self.base
    }

    /// The absolute target address, or `None` when absent or unresolvable.
    pub fn target(self) -> Option<u64> {
        if self.value == 0 {
            return None;
        }
        self.base.checked_add_signed(self.value as i64)
    }

    /// The absolute target address of an offset that must be present.
    pub fn require(self, what: &'static str) -> Result<u64> {
        self.target().ok_or(Error::MissingOffset {
            what,
            at: self.base,
        })
    }
}
