//! FTEX texture sections.
//!
//! An FTEX section embeds a complete GX2 surface description followed by the
//! tiled, encoded pixel payload. The payload is never interpreted here; the
//! section carries exactly what an external converter needs, and
//! [`Texture::to_gtx`] repackages it into a standalone GTX container for that
//! handoff.

use std::sync::Arc;

use latte_common::BinaryReader;
use latte_gtx::Gx2Surface;

use crate::offset::Offset;
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// GX2 surface formats an FTEX section may declare.
///
/// The tag value is the raw GX2 format register: the low byte selects the
/// channel layout, the high nibbles carry the sign/float/sRGB treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelFormat {
    R8Unorm = 0x001,
    R8Uint = 0x101,
    R8Snorm = 0x201,
    R8Sint = 0x301,
    R4G4Unorm = 0x002,
    R16Unorm = 0x005,
    R16Uint = 0x105,
    R16Snorm = 0x205,
    R16Sint = 0x305,
    R16Float = 0x806,
    R8G8Unorm = 0x007,
    R8G8Uint = 0x107,
    R8G8Snorm = 0x207,
    R8G8Sint = 0x307,
    R5G6B5Unorm = 0x008,
    R5G5B5A1Unorm = 0x00A,
    R4G4B4A4Unorm = 0x00B,
    A1B5G5R5Unorm = 0x00C,
    R32Uint = 0x10D,
    R32Sint = 0x30D,
    R32Float = 0x80E,
    R16G16Unorm = 0x00F,
    R16G16Uint = 0x10F,
    R16G16Snorm = 0x20F,
    R16G16Sint = 0x30F,
    R16G16Float = 0x810,
    D24S8Unorm = 0x011,
    X24G8Uint = 0x111,
    D24S8Float = 0x811,
    R11G11B10Float = 0x816,
    R10G10B10A2Unorm = 0x019,
    R10G10B10A2Uint = 0x119,
    R10G10B10A2Snorm = 0x219,
    R10G10B10A2Sint = 0x319,
    R8G8B8A8Unorm = 0x01A,
    R8G8B8A8Uint = 0x11A,
    R8G8B8A8Snorm = 0x21A,
    R8G8B8A8Sint = 0x31A,
    R8G8B8A8Srgb = 0x41A,
    A2B10G10R10Unorm = 0x01B,
    A2B10G10R10Uint = 0x11B,
    X32G8UintX24 = 0x11C,
    D32FloatS8UintX24 = 0x81C,
    R32G32Uint = 0x11D,
    R32G32Sint = 0x31D,
    R32G32Float = 0x81E,
    R16G16B16A16Unorm = 0x01F,
    R16G16B16A16Uint = 0x11F,
    R16G16B16A16Snorm = 0x21F,
    R16G16B16A16Sint = 0x31F,
    R16G16B16A16Float = 0x820,
    R32G32B32A32Uint = 0x122,
    R32G32B32A32Sint = 0x322,
    R32G32B32A32Float = 0x823,
    Bc1Unorm = 0x031,
    Bc1Srgb = 0x431,
    Bc2Unorm = 0x032,
    Bc2Srgb = 0x432,
    Bc3Unorm = 0x033,
    Bc3Srgb = 0x433,
    Bc4Unorm = 0x034,
    Bc4Snorm = 0x234,
    Bc5Unorm = 0x035,
    Bc5Snorm = 0x235,
    Nv12 = 0x081,
}

impl PixelFormat {
    /// Look up the format for a raw GX2 format register value.
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0x001 => Self::R8Unorm,
            0x101 => Self::R8Uint,
            0x201 => Self::R8Snorm,
            0x301 => Self::R8Sint,
            0x002 => Self::R4G4Unorm,
            0x005 => Self::R16Unorm,
            0x105 => Self::R16Uint,
            0x205 => Self::R16Snorm,
            0x305 => Self::R16Sint,
            0x806 => Self::R16Float,
            0x007 => Self::R8G8Unorm,
            0x107 => Self::R8G8Uint,
            0x207 => Self::R8G8Snorm,
            0x307 => Self::R8G8Sint,
            0x008 => Self::R5G6B5Unorm,
            0x00A => Self::R5G5B5A1Unorm,
            0x00B => Self::R4G4B4A4Unorm,
            0x00C => Self::A1B5G5R5Unorm,
            0x10D => Self::R32Uint,
            0x30D => Self::R32Sint,
            0x80E => Self::R32Float,
            0x00F => Self::R16G16Unorm,
            0x10F => Self::R16G16Uint,
            0x20F => Self::R16G16Snorm,
            0x30F => Self::R16G16Sint,
            0x810 => Self::R16G16Float,
            0x011 => Self::D24S8Unorm,
            0x111 => Self::X24G8Uint,
            0x811 => Self::D24S8Float,
            0x816 => Self::R11G11B10Float,
            0x019 => Self::R10G10B10A2Unorm,
            0x119 => Self::R10G10B10A2Uint,
            0x219 => Self::R10G10B10A2Snorm,
            0x319 => Self::R10G10B10A2Sint,
            0x01A => Self::R8G8B8A8Unorm,
            0x11A => Self::R8G8B8A8Uint,
            0x21A => Self::R8G8B8A8Snorm,
            0x31A => Self::R8G8B8A8Sint,
            0x41A => Self::R8G8B8A8Srgb,
            0x01B => Self::A2B10G10R10Unorm,
            0x11B => Self::A2B10G10R10Uint,
            0x11C => Self::X32G8UintX24,
            0x81C => Self::D32FloatS8UintX24,
            0x11D => Self::R32G32Uint,
            0x31D => Self::R32G32Sint,
            0x81E => Self::R32G32Float,
            0x01F => Self::R16G16B16A16Unorm,
            0x11F => Self::R16G16B16A16Uint,
            0x21F => Self::R16G16B16A16Snorm,
            0x31F => Self::R16G16B16A16Sint,
            0x820 => Self::R16G16B16A16Float,
            0x122 => Self::R32G32B32A32Uint,
            0x322 => Self::R32G32B32A32Sint,
            0x823 => Self::R32G32B32A32Float,
            0x031 => Self::Bc1Unorm,
            0x431 => Self::Bc1Srgb,
            0x032 => Self::Bc2Unorm,
            0x432 => Self::Bc2Srgb,
            0x033 => Self::Bc3Unorm,
            0x433 => Self::Bc3Srgb,
            0x034 => Self::Bc4Unorm,
            0x234 => Self::Bc4Snorm,
            0x035 => Self::Bc5Unorm,
            0x235 => Self::Bc5Snorm,
            0x081 => Self::Nv12,
            _ => return None,
        })
    }

    /// Whether the payload is block-compressed.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            Self::Bc1Unorm
                | Self::Bc1Srgb
                | Self::Bc2Unorm
                | Self::Bc2Srgb
                | Self::Bc3Unorm
                | Self::Bc3Srgb
                | Self::Bc4Unorm
                | Self::Bc4Snorm
                | Self::Bc5Unorm
                | Self::Bc5Snorm
        )
    }

    /// Whether the format stores color in sRGB space.
    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            Self::R8G8B8A8Srgb | Self::Bc1Srgb | Self::Bc2Srgb | Self::Bc3Srgb
        )
    }
}

/// An FTEX section: surface description plus the encoded payload.
#[derive(Debug, Clone)]
pub struct Texture {
    /// Texture name.
    name: Arc<str>,
    /// Validated surface format.
    format: PixelFormat,
    /// The raw GX2 surface registers.
    surface: Gx2Surface,
    /// Base level payload, still tiled and encoded.
    data: Vec<u8>,
    /// Mipmap payload, empty when the surface declares none.
    mipmap_data: Vec<u8>,
}

impl Texture {
    /// Read an FTEX section at the reader's current position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.expect_magic(b"FTEX")?;

        let mut surface = Gx2Surface {
            dim: reader.read_u32()?,
            width: reader.read_u32()?,
            height: reader.read_u32()?,
            depth: reader.read_u32()?,
            mip_count: reader.read_u32()?,
            format: reader.read_u32()?,
            aa_mode: reader.read_u32()?,
            usage: reader.read_u32()?,
            image_size: reader.read_u32()?,
            image_ptr: reader.read_u32()?,
            mip_size: reader.read_u32()?,
            mip_ptr: reader.read_u32()?,
            tile_mode: reader.read_u32()?,
            swizzle: reader.read_u32()?,
            alignment: reader.read_u32()?,
            pitch: reader.read_u32()?,
            ..Gx2Surface::default()
        };
        for slot in &mut surface.mip_offsets {
            *slot = reader.read_u32()?;
        }
        for slot in &mut surface.regs {
            *slot = reader.read_u32()?;
        }
        reader.read_u32()?;
        reader.read_u32()?;
        let name = read_name(reader, strings)?;
        reader.read_u32()?;
        let data_offset = Offset::read(reader)?;
        let mipmap_data_offset = Offset::read(reader)?;
        reader.read_u32()?;
        reader.read_u32()?;

        let format = PixelFormat::from_raw(surface.format).ok_or_else(|| {
            Error::UnsupportedPixelFormat {
                texture: name.to_string(),
                value: surface.format,
            }
        })?;

        reader.seek(data_offset.require("texture data")? as usize);
        let data = reader.read_bytes(surface.image_size as usize)?.to_vec();

        let mipmap_data = if surface.mip_size > 0 {
            reader.seek(mipmap_data_offset.require("mipmap data")? as usize);
            reader.read_bytes(surface.mip_size as usize)?.to_vec()
        } else {
            Vec::new()
        };

        Ok(Self {
            name,
            format,
            surface,
            data,
            mipmap_data,
        })
    }

    /// Texture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the base level in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Height of the base level in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// Depth in pixels, or array layer count.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.surface.depth
    }

    /// Number of mip levels, the base level included.
    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.surface.mip_count
    }

    /// Validated surface format.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// The raw GX2 surface registers.
    pub fn surface(&self) -> &Gx2Surface {
        &self.surface
    }

    /// Base level payload, still tiled and encoded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mipmap payload. Empty when the surface declares no extra levels.
    pub fn mipmap_data(&self) -> &[u8] {
        &self.mipmap_data
    }

    /// Repackage the surface and payloads as a standalone GTX container.
    pub fn to_gtx(&self) -> Result<Vec<u8>> {
        Ok(latte_gtx::encode(&self.surface, &self.data, &self.mipmap_data)?)
    }
}
