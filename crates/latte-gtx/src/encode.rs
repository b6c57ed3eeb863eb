//! GTX container assembly.

use zerocopy::IntoBytes;

use crate::block::{BlockHeader, FileHeader};
use crate::{Error, Gx2Surface, Result};

/// Build a standalone GTX file from a surface description and its payloads.
///
/// The output carries the file header, the surface register block, the base
/// image block, the mipmap block (present even when empty, as the reference
/// tools write it), and the end-of-file block. Payload lengths must match the
/// sizes the surface declares.
pub fn encode(surface: &Gx2Surface, image: &[u8], mipmaps: &[u8]) -> Result<Vec<u8>> {
    if image.len() != surface.image_size as usize {
        return Err(Error::ImageSizeMismatch {
            declared: surface.image_size,
            actual: image.len(),
        });
    }
    if mipmaps.len() != surface.mip_size as usize {
        return Err(Error::MipmapSizeMismatch {
            declared: surface.mip_size,
            actual: mipmaps.len(),
        });
    }

    let total = FileHeader::SIZE
        + 4 * BlockHeader::SIZE
        + Gx2Surface::SIZE
        + image.len()
        + mipmaps.len();
    let mut out = Vec::with_capacity(total);

    out.extend_from_slice(FileHeader::new().as_bytes());

    out.extend_from_slice(
        BlockHeader::new(BlockHeader::SURFACE_BLOCK, Gx2Surface::SIZE as u32).as_bytes(),
    );
    for word in surface.words() {
        out.extend_from_slice(&word.to_be_bytes());
    }

    out.extend_from_slice(BlockHeader::new(BlockHeader::IMAGE_BLOCK, image.len() as u32).as_bytes());
    out.extend_from_slice(image);

    out.extend_from_slice(
        BlockHeader::new(BlockHeader::MIPMAP_BLOCK, mipmaps.len() as u32).as_bytes(),
    );
    out.extend_from_slice(mipmaps);

    out.extend_from_slice(BlockHeader::new(BlockHeader::EOF_BLOCK, 0).as_bytes());

    Ok(out)
}
