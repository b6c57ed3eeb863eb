//! On-disk GTX container structures.

use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{BLOCK_MAGIC, GFX2_MAGIC};

type U32Be = U32<BigEndian>;

/// GTX file header (32 bytes, big-endian).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileHeader {
    /// Magic bytes ("Gfx2").
    pub magic: [u8; 4],
    /// Header size (always 32).
    pub header_size: U32Be,
    /// Major container version.
    pub version_major: U32Be,
    /// Minor container version.
    pub version_minor: U32Be,
    /// Target GPU generation.
    pub gpu_version: U32Be,
    /// Alignment mode.
    pub align_mode: U32Be,
    pub reserved1: U32Be,
    pub reserved2: U32Be,
}

impl FileHeader {
    /// Size of the encoded header.
    pub const SIZE: usize = 32;

    pub fn new() -> Self {
        Self {
            magic: *GFX2_MAGIC,
            header_size: U32Be::new(Self::SIZE as u32),
            version_major: U32Be::new(7),
            version_minor: U32Be::new(1),
            gpu_version: U32Be::new(2),
            align_mode: U32Be::new(0),
            reserved1: U32Be::new(0),
            reserved2: U32Be::new(0),
        }
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// GTX block header (32 bytes, big-endian), followed by `data_size` bytes.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct BlockHeader {
    /// Magic bytes ("BLK{").
    pub magic: [u8; 4],
    /// Header size (always 32).
    pub header_size: U32Be,
    /// Major block version.
    pub version_major: U32Be,
    /// Minor block version.
    pub version_minor: U32Be,
    /// Block kind (one of the `*_BLOCK` constants).
    pub kind: U32Be,
    /// Byte length of the block payload.
    pub data_size: U32Be,
    /// Block identifier.
    pub id: U32Be,
    /// Index among blocks of the same kind.
    pub type_index: U32Be,
}

impl BlockHeader {
    /// Size of the encoded header.
    pub const SIZE: usize = 32;

    /// End-of-file marker block.
    pub const EOF_BLOCK: u32 = 1;
    /// Surface register block.
    pub const SURFACE_BLOCK: u32 = 11;
    /// Base level image payload block.
    pub const IMAGE_BLOCK: u32 = 12;
    /// Mipmap payload block.
    pub const MIPMAP_BLOCK: u32 = 13;

    pub fn new(kind: u32, data_size: u32) -> Self {
        Self {
            magic: *BLOCK_MAGIC,
            header_size: U32Be::new(Self::SIZE as u32),
            version_major: U32Be::new(1),
            version_minor: U32Be::new(0),
            kind: U32Be::new(kind),
            data_size: U32Be::new(data_size),
            id: U32Be::new(0),
            type_index: U32Be::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    #[test]
    fn test_file_header_layout() {
        let header = FileHeader::new();
        let bytes = header.as_bytes();

        assert_eq!(bytes.len(), FileHeader::SIZE);
        assert_eq!(&bytes[0..4], b"Gfx2");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 32]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 7]);
    }

    #[test]
    fn test_block_header_layout() {
        let header = BlockHeader::new(BlockHeader::SURFACE_BLOCK, 156);
        let bytes = header.as_bytes();

        assert_eq!(bytes.len(), BlockHeader::SIZE);
        assert_eq!(&bytes[0..4], b"BLK{");
        assert_eq!(&bytes[16..20], &[0, 0, 0, 11]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 156]);
    }
}
