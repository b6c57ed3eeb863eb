//! GX2 surface description.

/// A GX2 texture surface as the GPU registers describe it.
///
/// This is the 156-byte register block a GTX surface block carries: sixteen
/// header words, thirteen mip level offsets, and the ten texture-view and
/// component-select words. Values are kept exactly as read from the source
/// container; nothing here interprets the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gx2Surface {
    /// Surface dimension (1D, 2D, 3D, cube, arrays).
    pub dim: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Number of mip levels, the base level included.
    pub mip_count: u32,
    /// GX2 surface format register value.
    pub format: u32,
    /// Anti-aliasing mode (sample count).
    pub aa_mode: u32,
    /// Surface usage flags (texture, color buffer, depth buffer, ...).
    pub usage: u32,
    /// Byte length of the base level payload.
    pub image_size: u32,
    /// Runtime image pointer, zero on disk.
    pub image_ptr: u32,
    /// Byte length of the mipmap payload.
    pub mip_size: u32,
    /// Runtime mipmap pointer, zero on disk.
    pub mip_ptr: u32,
    pub tile_mode: u32,
    pub swizzle: u32,
    pub alignment: u32,
    pub pitch: u32,
    /// Byte offsets of the mip levels inside the mipmap payload.
    pub mip_offsets: [u32; 13],
    /// Texture view range and component-select registers.
    pub regs: [u32; 10],
}

impl Gx2Surface {
    /// Byte length of the encoded surface block.
    pub const SIZE: usize = 156;

    /// The surface words in block order.
    pub(crate) fn words(&self) -> impl Iterator<Item = u32> + '_ {
        [
            self.dim,
            self.width,
            self.height,
            self.depth,
            self.mip_count,
            self.format,
            self.aa_mode,
            self.usage,
            self.image_size,
            self.image_ptr,
            self.mip_size,
            self.mip_ptr,
            self.tile_mode,
            self.swizzle,
            self.alignment,
            self.pitch,
        ]
        .into_iter()
        .chain(self.mip_offsets)
        .chain(self.regs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_matches_block_size() {
        let surface = Gx2Surface::default();
        assert_eq!(surface.words().count() * 4, Gx2Surface::SIZE);
    }
}
