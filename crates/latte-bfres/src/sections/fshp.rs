//! FSHP shape sections.
//!
//! An FSHP section is one polygon group of a model: it names the vertex
//! buffer it draws from, the material it is rendered with, and carries one or
//! more level-of-detail submeshes. Each LOD has its own index buffer; the
//! first LOD is the most detailed one. Index data is normalized to `u32`
//! regardless of the stored width.

use std::sync::Arc;

use latte_common::BinaryReader;

use crate::offset::Offset;
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// Primitive topologies a LOD submesh can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveType {
    /// Isolated points.
    Points = 0x01,
    /// Isolated line segments.
    Lines = 0x02,
    /// Connected line strip.
    LineStrip = 0x03,
    /// Isolated triangles.
    Triangles = 0x04,
    /// Triangle fan around the first vertex.
    TriangleFan = 0x05,
    /// Connected triangle strip.
    TriangleStrip = 0x06,
    /// Isolated quads.
    Quads = 0x13,
    /// Connected quad strip.
    QuadStrip = 0x14,
}

impl PrimitiveType {
    /// Look up the topology for a raw tag value.
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0x01 => Self::Points,
            0x02 => Self::Lines,
            0x03 => Self::LineStrip,
            0x04 => Self::Triangles,
            0x05 => Self::TriangleFan,
            0x06 => Self::TriangleStrip,
            0x13 => Self::Quads,
            0x14 => Self::QuadStrip,
            _ => return None,
        })
    }
}

/// Storage formats of an index buffer.
///
/// The width and byte order are a property of the buffer itself, not of the
/// containing document, so a big-endian file may carry little-endian indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum IndexFormat {
    /// 16-bit little-endian indices.
    U16LittleEndian = 0,
    /// 32-bit little-endian indices.
    U32LittleEndian = 1,
    /// 8-bit indices.
    U8 = 2,
    /// 16-bit big-endian indices.
    U16BigEndian = 4,
    /// 32-bit big-endian indices.
    U32BigEndian = 9,
}

impl IndexFormat {
    /// Look up the format for a raw tag value.
    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::U16LittleEndian,
            1 => Self::U32LittleEndian,
            2 => Self::U8,
            4 => Self::U16BigEndian,
            9 => Self::U32BigEndian,
            _ => return None,
        })
    }

    /// Byte width of one stored index.
    pub fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16LittleEndian | Self::U16BigEndian => 2,
            Self::U32LittleEndian | Self::U32BigEndian => 4,
        }
    }

    /// Widen a raw index buffer to `u32` values.
    ///
    /// `data` must be a multiple of [`width`](Self::width) bytes.
    pub(crate) fn decode(self, data: &[u8]) -> Vec<u32> {
        match self {
            Self::U8 => data.iter().map(|&b| u32::from(b)).collect(),
            Self::U16LittleEndian => data
                .chunks_exact(2)
                .map(|c| u32::from(u16::from_le_bytes([c[0], c[1]])))
                .collect(),
            Self::U16BigEndian => data
                .chunks_exact(2)
                .map(|c| u32::from(u16::from_be_bytes([c[0], c[1]])))
                .collect(),
            Self::U32LittleEndian => data
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            Self::U32BigEndian => data
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }
}

/// A contiguous run of indices that can be culled as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityGroup {
    /// Byte offset of the run within the index buffer.
    pub index_byte_offset: u32,
    /// Number of indices in the run.
    pub index_count: u32,
}

impl VisibilityGroup {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            index_byte_offset: reader.read_u32()?,
            index_count: reader.read_u32()?,
        })
    }
}

/// One level-of-detail submesh of a shape.
#[derive(Debug, Clone)]
pub struct LodModel {
    /// Topology the indices describe.
    primitive_type: PrimitiveType,
    /// Storage format the indices were read from.
    index_format: IndexFormat,
    /// Offset into the vertex buffer for this LOD's vertices.
    skip_vertices: u32,
    /// Cullable index runs.
    visibility_groups: Vec<VisibilityGroup>,
    /// Index data, widened to `u32`.
    indices: Vec<u32>,
}

impl LodModel {
    /// Read a LOD submesh. `shape` is the owning shape's name, used in
    /// error reports.
    fn read(reader: &mut BinaryReader<'_>, shape: &str) -> Result<Self> {
        let raw_topology = reader.read_u32()?;
        let primitive_type =
            PrimitiveType::from_raw(raw_topology).ok_or_else(|| Error::UnsupportedPrimitiveType {
                shape: shape.to_string(),
                value: raw_topology,
            })?;
        let raw_format = reader.read_u32()?;
        let index_format =
            IndexFormat::from_raw(raw_format).ok_or_else(|| Error::UnsupportedIndexFormat {
                shape: shape.to_string(),
                value: raw_format,
            })?;
        let total_index_count = reader.read_u32()?;
        let visibility_group_count = reader.read_u16()?;
        reader.read_u16()?;
        let visibility_group_offset = Offset::read(reader)?;
        let index_buffer_offset = Offset::read(reader)?;
        let skip_vertices = reader.read_u32()?;

        // LOD headers are stored as a contiguous array.
        let saved = reader.position();

        // The array offset may be absent when the LOD declares no groups.
        let mut visibility_groups = Vec::with_capacity(usize::from(visibility_group_count));
        if visibility_group_count > 0 {
            reader.seek(visibility_group_offset.require("visibility group array")? as usize);
            for _ in 0..visibility_group_count {
                visibility_groups.push(VisibilityGroup::read(reader)?);
            }
        }

        reader.seek(index_buffer_offset.require("index buffer")? as usize);
        let indices = read_index_buffer(reader, shape, index_format, total_index_count)?;

        reader.seek(saved);

        Ok(Self {
            primitive_type,
            index_format,
            skip_vertices,
            visibility_groups,
            indices,
        })
    }

    /// Topology the indices describe.
    #[inline]
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    /// Storage format the indices were read from.
    #[inline]
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Number of vertices to skip in the vertex buffer for this LOD.
    #[inline]
    pub fn skip_vertices(&self) -> u32 {
        self.skip_vertices
    }

    /// Cullable index runs.
    pub fn visibility_groups(&self) -> &[VisibilityGroup] {
        &self.visibility_groups
    }

    /// Index data, widened to `u32`.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// Read an index buffer header and decode its payload.
fn read_index_buffer(
    reader: &mut BinaryReader<'_>,
    shape: &str,
    format: IndexFormat,
    declared: u32,
) -> Result<Vec<u32>> {
    reader.read_u32()?;
    let size_in_bytes = reader.read_u32()?;
    reader.read_u32()?;
    reader.read_u16()?;
    reader.read_u16()?;
    reader.read_u32()?;
    let data_offset = Offset::read(reader)?;

    let width = format.width();
    let size = size_in_bytes as usize;
    if size % width != 0 || size / width != declared as usize {
        return Err(Error::IndexBufferSize {
            shape: shape.to_string(),
            size: size_in_bytes,
            declared,
            width,
        });
    }

    reader.seek(data_offset.require("index data")? as usize);
    let data = reader.read_bytes(size)?;
    Ok(format.decode(data))
}

/// An FSHP section: one polygon group with its LOD submeshes.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Shape name.
    name: Arc<str>,
    /// Position of this shape in the model's FSHP index group.
    index: u16,
    /// Index of the material rendering this shape.
    material_index: u16,
    /// Index of the vertex buffer this shape draws from.
    buffer_index: u16,
    /// LOD submeshes, most detailed first.
    lods: Vec<LodModel>,
}

impl Shape {
    /// Read an FSHP section at the reader's current position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.expect_magic(b"FSHP")?;
        let name = read_name(reader, strings)?;
        reader.read_u32()?;
        let index = reader.read_u16()?;
        let material_index = reader.read_u16()?;
        let _bone_index = reader.read_u16()?;
        let buffer_index = reader.read_u16()?;
        let _skinning_index_count = reader.read_u16()?;
        reader.read_u8()?;
        let lod_count = reader.read_u8()?;
        let _visibility_tree_node_count = reader.read_u32()?;
        let _bounding_radius = reader.read_f32()?;
        let _vertex_buffer = Offset::read(reader)?;
        let lod_array = Offset::read(reader)?;
        let _skinning_index_array = Offset::read(reader)?;
        let _unknown = Offset::read(reader)?;
        let _visibility_tree_nodes = Offset::read(reader)?;
        let _visibility_tree_ranges = Offset::read(reader)?;
        let _visibility_tree_indices = Offset::read(reader)?;
        reader.read_u32()?;

        reader.seek(lod_array.require("LOD array")? as usize);
        let mut lods = Vec::with_capacity(usize::from(lod_count));
        for _ in 0..lod_count {
            lods.push(LodModel::read(reader, &name)?);
        }

        Ok(Self {
            name,
            index,
            material_index,
            buffer_index,
            lods,
        })
    }

    /// Shape name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this shape in the model's FSHP index group.
    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Index of the material rendering this shape, into the model's FMAT
    /// index group.
    #[inline]
    pub fn material_index(&self) -> usize {
        usize::from(self.material_index)
    }

    /// Index of the vertex buffer this shape draws from, into the model's
    /// FVTX array.
    #[inline]
    pub fn buffer_index(&self) -> usize {
        usize::from(self.buffer_index)
    }

    /// LOD submeshes, most detailed first.
    pub fn lods(&self) -> &[LodModel] {
        &self.lods
    }

    /// The most detailed LOD submesh.
    pub fn highest_detail(&self) -> Option<&LodModel> {
        self.lods.first()
    }
}
