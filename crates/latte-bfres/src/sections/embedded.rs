//! Embedded files.
//!
//! The last root index group of a BFRES container lists opaque files carried
//! along with the model data, usually shader binaries or collision data. The
//! entry is just an offset and a byte length; the contents are copied out
//! without interpretation.

use latte_common::BinaryReader;

use crate::offset::Offset;
use crate::strings::StringPool;
use crate::Result;

/// An opaque file embedded in the container.
#[derive(Debug, Clone)]
pub struct EmbeddedFile {
    data: Vec<u8>,
}

impl EmbeddedFile {
    /// Read an embedded file entry at the reader's current position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, _strings: &mut StringPool) -> Result<Self> {
        let offset = Offset::read(reader)?;
        let size_in_bytes = reader.read_u32()?;

        reader.seek(offset.require("embedded file data")? as usize);
        let data = reader.read_bytes(size_in_bytes as usize)?.to_vec();

        Ok(Self { data })
    }

    /// File contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte length of the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
