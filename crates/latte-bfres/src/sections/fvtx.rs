//! FVTX vertex buffer sections.
//!
//! An FVTX section describes the packed per-vertex data of a model: a set of
//! named attributes (`_p0` position, `_n0` normal, `_u0` first UV layer and
//! so on), each pointing into one of several interleaved data buffers. The
//! attribute's format tag controls how many bytes one element occupies and
//! how those bytes convert to float components.

use std::sync::Arc;

use latte_common::{BinaryReader, Endian};

use crate::index_group::IndexGroup;
use crate::offset::Offset;
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// Vertex attribute element encodings.
///
/// The tag value encodes the GX2 attribute format. Integer variants decode to
/// their raw numeric value, normalized variants to the stored value divided
/// by the format's maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttribFormat {
    /// Two 8-bit values scaled to `[0, 1]`.
    Unorm8x2 = 0x004,
    /// Two 16-bit values scaled to `[0, 1]`.
    Unorm16x2 = 0x007,
    /// Four 8-bit values, kept as raw integers.
    Unorm8x4 = 0x00a,
    /// One 8-bit integer.
    Uint8 = 0x100,
    /// Two 8-bit integers.
    Uint8x2 = 0x104,
    /// Four 8-bit integers.
    Uint8x4 = 0x10a,
    /// Two 16-bit values read unsigned and scaled by the signed maximum.
    Snorm16x2 = 0x207,
    /// Four signed 8-bit integers.
    Sint8x4 = 0x20a,
    /// Three values packed into 32 bits, scaled by 511.
    Snorm10x3 = 0x20b,
    /// Two half-precision floats.
    Float16x2 = 0x808,
    /// Two single-precision floats.
    Float32x2 = 0x80d,
    /// Four half-precision floats.
    Float16x4 = 0x80f,
    /// Three single-precision floats.
    Float32x3 = 0x811,
}

impl AttribFormat {
    /// Look up the format for a raw tag value.
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0x004 => Self::Unorm8x2,
            0x007 => Self::Unorm16x2,
            0x00a => Self::Unorm8x4,
            0x100 => Self::Uint8,
            0x104 => Self::Uint8x2,
            0x10a => Self::Uint8x4,
            0x207 => Self::Snorm16x2,
            0x20a => Self::Sint8x4,
            0x20b => Self::Snorm10x3,
            0x808 => Self::Float16x2,
            0x80d => Self::Float32x2,
            0x80f => Self::Float16x4,
            0x811 => Self::Float32x3,
            _ => return None,
        })
    }

    /// Byte size of one element of this format.
    pub fn element_size(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Unorm8x2 | Self::Uint8x2 => 2,
            Self::Unorm16x2
            | Self::Unorm8x4
            | Self::Uint8x4
            | Self::Snorm16x2
            | Self::Sint8x4
            | Self::Snorm10x3
            | Self::Float16x2 => 4,
            Self::Float32x2 | Self::Float16x4 => 8,
            Self::Float32x3 => 12,
        }
    }

    /// Number of meaningful components per element.
    pub fn components(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Unorm8x2
            | Self::Unorm16x2
            | Self::Uint8x2
            | Self::Snorm16x2
            | Self::Float16x2
            | Self::Float32x2 => 2,
            Self::Snorm10x3 | Self::Float32x3 => 3,
            Self::Unorm8x4 | Self::Uint8x4 | Self::Sint8x4 | Self::Float16x4 => 4,
        }
    }

    /// Decode one element into float components.
    ///
    /// `element` must be exactly [`element_size`](Self::element_size) bytes.
    /// Components beyond [`components`](Self::components) are zero.
    pub(crate) fn decode(self, element: &[u8], endian: Endian) -> [f32; 4] {
        match self {
            Self::Unorm8x2 => [
                f32::from(element[0]) / 255.0,
                f32::from(element[1]) / 255.0,
                0.0,
                0.0,
            ],
            Self::Unorm16x2 => [
                f32::from(read_u16(element, 0, endian)) / 65535.0,
                f32::from(read_u16(element, 2, endian)) / 65535.0,
                0.0,
                0.0,
            ],
            Self::Unorm8x4 | Self::Uint8x4 => [
                f32::from(element[0]),
                f32::from(element[1]),
                f32::from(element[2]),
                f32::from(element[3]),
            ],
            Self::Uint8 => [f32::from(element[0]), 0.0, 0.0, 0.0],
            Self::Uint8x2 => [f32::from(element[0]), f32::from(element[1]), 0.0, 0.0],
            Self::Snorm16x2 => [
                f32::from(read_u16(element, 0, endian)) / 32767.0,
                f32::from(read_u16(element, 2, endian)) / 32767.0,
                0.0,
                0.0,
            ],
            Self::Sint8x4 => [
                f32::from(element[0] as i8),
                f32::from(element[1] as i8),
                f32::from(element[2] as i8),
                f32::from(element[3] as i8),
            ],
            Self::Snorm10x3 => {
                let packed = read_u32(element, 0, endian);
                [
                    ((packed & 0x3FC0_0000) >> 22) as f32 / 511.0,
                    ((packed & 0x000F_F000) >> 12) as f32 / 511.0,
                    ((packed & 0x0000_03FC) >> 2) as f32 / 511.0,
                    0.0,
                ]
            }
            Self::Float16x2 => [
                f16_to_f32(read_u16(element, 0, endian)),
                f16_to_f32(read_u16(element, 2, endian)),
                0.0,
                0.0,
            ],
            Self::Float32x2 => [
                read_f32(element, 0, endian),
                read_f32(element, 4, endian),
                0.0,
                0.0,
            ],
            Self::Float16x4 => [
                f16_to_f32(read_u16(element, 0, endian)),
                f16_to_f32(read_u16(element, 2, endian)),
                f16_to_f32(read_u16(element, 4, endian)),
                f16_to_f32(read_u16(element, 6, endian)),
            ],
            Self::Float32x3 => [
                read_f32(element, 0, endian),
                read_f32(element, 4, endian),
                read_f32(element, 8, endian),
                0.0,
            ],
        }
    }
}

/// One named vertex attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Attribute name (`_p0`, `_n0`, `_u0`, ...).
    name: Arc<str>,
    /// Index of the data buffer holding this attribute.
    buffer_index: u8,
    /// Byte offset of this attribute within each buffer element.
    element_offset: u32,
    /// Element encoding.
    format: AttribFormat,
}

impl Attribute {
    /// Read an attribute description.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        let name = read_name(reader, strings)?;
        // Packed as XXYYYYYY: top byte buffer index, rest element offset.
        let packed = reader.read_u32()?;
        let buffer_index = (packed >> 24) as u8;
        let element_offset = packed & 0x00FF_FFFF;
        let raw = reader.read_u32()?;
        let format = AttribFormat::from_raw(raw).ok_or_else(|| Error::UnsupportedAttribFormat {
            attribute: name.to_string(),
            value: raw,
        })?;
        Ok(Self {
            name,
            buffer_index,
            element_offset,
            format,
        })
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the data buffer this attribute reads from.
    #[inline]
    pub fn buffer_index(&self) -> usize {
        usize::from(self.buffer_index)
    }

    /// Byte offset within each element of the buffer.
    #[inline]
    pub fn element_offset(&self) -> u32 {
        self.element_offset
    }

    /// Element encoding.
    #[inline]
    pub fn format(&self) -> AttribFormat {
        self.format
    }
}

/// One raw interleaved vertex data buffer.
#[derive(Debug, Clone)]
pub struct DataBuffer {
    /// Byte size of one element.
    stride: u16,
    /// Raw buffer contents.
    data: Vec<u8>,
}

impl DataBuffer {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_u32()?;
        let size_in_bytes = reader.read_u32()?;
        reader.read_u32()?;
        let stride = reader.read_u16()?;
        reader.read_u16()?;
        reader.read_u32()?;
        let data_offset = Offset::read(reader)?;

        let target = data_offset.require("vertex data")?;
        let saved = reader.position();
        reader.seek(target as usize);
        let data = reader.read_bytes(size_in_bytes as usize)?.to_vec();
        reader.seek(saved);

        Ok(Self { stride, data })
    }

    /// Byte size of one element.
    #[inline]
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// Raw buffer contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// An FVTX section: attribute layout plus the raw buffers it indexes into.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    /// Position of this section in the model's FVTX array.
    index: u16,
    /// Number of vertices across all buffers.
    vertex_count: u32,
    /// Attribute descriptions, keyed by attribute name.
    attributes: IndexGroup<Attribute>,
    /// Interleaved data buffers.
    buffers: Vec<DataBuffer>,
    /// Byte order the buffers were written in.
    endian: Endian,
}

impl VertexBuffer {
    /// Read an FVTX section header and its attribute and buffer tables.
    ///
    /// FVTX headers are stored as a contiguous array, so the reader is left
    /// just past the fixed-size header on return.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.expect_magic(b"FVTX")?;
        let _attribute_count = reader.read_u8()?;
        let buffer_count = reader.read_u8()?;
        let index = reader.read_u16()?;
        let vertex_count = reader.read_u32()?;
        reader.read_u32()?;
        let _attribute_array = Offset::read(reader)?;
        let attribute_group = Offset::read(reader)?;
        let buffer_array = Offset::read(reader)?;
        reader.read_u32()?;

        let saved = reader.position();
        let endian = reader.endian();

        reader.seek(attribute_group.require("attribute index group")? as usize);
        let attributes = IndexGroup::parse(reader, strings, Attribute::read)?;

        reader.seek(buffer_array.require("vertex buffer array")? as usize);
        let mut buffers = Vec::with_capacity(usize::from(buffer_count));
        for _ in 0..buffer_count {
            buffers.push(DataBuffer::read(reader)?);
        }

        reader.seek(saved);

        let vertex_buffer = Self {
            index,
            vertex_count,
            attributes,
            buffers,
            endian,
        };
        vertex_buffer.validate()?;
        Ok(vertex_buffer)
    }

    /// Check that every attribute stays within its buffer and every buffer
    /// holds the declared vertex count.
    fn validate(&self) -> Result<()> {
        for entry in &self.attributes {
            self.check_attribute(&entry.value)?;
        }
        for (index, buffer) in self.buffers.iter().enumerate() {
            let needed = self.vertex_count as usize * usize::from(buffer.stride);
            if needed > buffer.data.len() {
                return Err(Error::VertexBufferSize {
                    buffer: index,
                    size: buffer.data.len(),
                    vertex_count: self.vertex_count,
                    stride: buffer.stride,
                });
            }
        }
        Ok(())
    }

    fn check_attribute(&self, attribute: &Attribute) -> Result<&DataBuffer> {
        let index = attribute.buffer_index();
        let buffer = self.buffers.get(index).ok_or_else(|| Error::IndexOutOfRange {
            what: "attribute data buffer",
            name: attribute.name.to_string(),
            index,
            count: self.buffers.len(),
        })?;
        let size = attribute.format.element_size();
        if attribute.element_offset as usize + size > usize::from(buffer.stride) {
            return Err(Error::AttributeOverflow {
                attribute: attribute.name.to_string(),
                offset: attribute.element_offset,
                size,
                stride: buffer.stride,
            });
        }
        Ok(buffer)
    }

    /// Position of this section in the model's FVTX array.
    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Number of vertices in this buffer.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Attribute descriptions, keyed by name.
    pub fn attributes(&self) -> &IndexGroup<Attribute> {
        &self.attributes
    }

    /// Raw interleaved data buffers.
    pub fn buffers(&self) -> &[DataBuffer] {
        &self.buffers
    }

    /// Decode one attribute into per-vertex float components.
    ///
    /// Unused trailing components are zero; see
    /// [`AttribFormat::components`] for how many are meaningful.
    pub fn values(&self, attribute: &Attribute) -> Result<Vec<[f32; 4]>> {
        let buffer = self.check_attribute(attribute)?;
        let stride = usize::from(buffer.stride);
        let offset = attribute.element_offset as usize;
        let size = attribute.format.element_size();

        let mut out = Vec::with_capacity(self.vertex_count as usize);
        for i in 0..self.vertex_count as usize {
            let start = i * stride + offset;
            out.push(attribute.format.decode(&buffer.data[start..start + size], self.endian));
        }
        Ok(out)
    }

    /// Decode a named attribute, or `None` if the buffer does not carry it.
    pub fn decode(&self, name: &str) -> Option<Result<Vec<[f32; 4]>>> {
        self.attributes.get(name).map(|a| self.values(a))
    }

    /// Vertex positions (`_p0`), if present.
    pub fn positions(&self) -> Option<Result<Vec<[f32; 4]>>> {
        self.decode("_p0")
    }

    /// Vertex normals (`_n0`), if present.
    pub fn normals(&self) -> Option<Result<Vec<[f32; 4]>>> {
        self.decode("_n0")
    }

    /// First UV layer (`_u0`), if present. Further layers are not decoded.
    pub fn texcoords(&self) -> Option<Result<Vec<[f32; 4]>>> {
        self.decode("_u0")
    }
}

fn read_u16(bytes: &[u8], offset: usize, endian: Endian) -> u16 {
    let raw = [bytes[offset], bytes[offset + 1]];
    match endian {
        Endian::Big => u16::from_be_bytes(raw),
        Endian::Little => u16::from_le_bytes(raw),
    }
}

fn read_u32(bytes: &[u8], offset: usize, endian: Endian) -> u32 {
    let raw = [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ];
    match endian {
        Endian::Big => u32::from_be_bytes(raw),
        Endian::Little => u32::from_le_bytes(raw),
    }
}

fn read_f32(bytes: &[u8], offset: usize, endian: Endian) -> f32 {
    f32::from_bits(read_u32(bytes, offset, endian))
}

/// Widen an IEEE 754 half-precision value to single precision.
fn f16_to_f32(bits: u16) -> f32 {
    let sign = u32::from(bits >> 15) << 31;
    let exponent = u32::from((bits >> 10) & 0x1F);
    let fraction = u32::from(bits & 0x3FF);

    let word = match (exponent, fraction) {
        (0, 0) => sign,
        (0, _) => {
            // Subnormal: renormalize around the top fraction bit.
            let top = 31 - fraction.leading_zeros();
            let exponent = top + 103;
            let fraction = (fraction ^ (1 << top)) << (23 - top);
            sign | (exponent << 23) | fraction
        }
        (0x1F, 0) => sign | 0x7F80_0000,
        (0x1F, _) => sign | 0x7FC0_0000 | (fraction << 13),
        _ => sign | ((exponent + 112) << 23) | (fraction << 13),
    };
    f32::from_bits(word)
}
