//! FMDL model sections.
//!
//! An FMDL section is one complete model: an array of vertex buffers, a
//! group of shapes indexing into them, and a group of materials the shapes
//! are rendered with. Shapes reference vertex buffers and materials by
//! position, so both cross-references are checked while the model is built.
//! Skeleton data (FSKL) is present in the container but not decoded.

use std::sync::Arc;

use latte_common::BinaryReader;

use crate::index_group::IndexGroup;
use crate::offset::Offset;
use crate::sections::{Material, Shape, VertexBuffer};
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// A named floating-point model parameter.
#[derive(Debug, Clone)]
pub struct ModelParam {
    /// Parameter name.
    name: Arc<str>,
    /// Parameter value.
    value: f32,
}

impl ModelParam {
    fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        let name = read_name(reader, strings)?;
        reader.read_u16()?;
        reader.read_u16()?;
        let value = reader.read_f32()?;
        Ok(Self { name, value })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// An FMDL section: one model with its geometry and materials.
#[derive(Debug, Clone)]
pub struct Model {
    /// Model name.
    name: Arc<str>,
    /// Vertex buffers, indexed by shapes.
    vertex_buffers: Vec<VertexBuffer>,
    /// Polygon groups, keyed by name.
    shapes: IndexGroup<Shape>,
    /// Materials, keyed by name.
    materials: IndexGroup<Material>,
    /// Model parameters, keyed by name. Often absent.
    params: IndexGroup<ModelParam>,
}

impl Model {
    /// Read an FMDL section at the reader's current position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.expect_magic(b"FMDL")?;
        let name = read_name(reader, strings)?;
        let _data = Offset::read(reader)?;
        let _skeleton = Offset::read(reader)?;
        let vertex_buffer_array = Offset::read(reader)?;
        let shape_group = Offset::read(reader)?;
        let material_group = Offset::read(reader)?;
        let param_group = Offset::read(reader)?;
        let vertex_buffer_count = reader.read_u16()?;
        let _shape_count = reader.read_u16()?;
        let _material_count = reader.read_u16()?;
        let _param_count = reader.read_u16()?;
        reader.read_u32()?;

        reader.seek(vertex_buffer_array.require("vertex buffer array")? as usize);
        let mut vertex_buffers = Vec::with_capacity(usize::from(vertex_buffer_count));
        for _ in 0..vertex_buffer_count {
            vertex_buffers.push(VertexBuffer::read(reader, strings)?);
        }

        reader.seek(shape_group.require("shape index group")? as usize);
        let shapes = IndexGroup::parse(reader, strings, Shape::read)?;

        reader.seek(material_group.require("material index group")? as usize);
        let materials = IndexGroup::parse(reader, strings, Material::read)?;

        let params = match param_group.target() {
            Some(target) => {
                reader.seek(target as usize);
                IndexGroup::parse(reader, strings, ModelParam::read)?
            }
            None => IndexGroup::default(),
        };

        for entry in &shapes {
            let shape = &entry.value;
            if shape.buffer_index() >= vertex_buffers.len() {
                return Err(Error::IndexOutOfRange {
                    what: "vertex buffer",
                    name: shape.name().to_string(),
                    index: shape.buffer_index(),
                    count: vertex_buffers.len(),
                });
            }
            if shape.material_index() >= materials.len() {
                return Err(Error::IndexOutOfRange {
                    what: "material",
                    name: shape.name().to_string(),
                    index: shape.material_index(),
                    count: materials.len(),
                });
            }
        }

        Ok(Self {
            name,
            vertex_buffers,
            shapes,
            materials,
            params,
        })
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex buffers, in FVTX array order.
    pub fn vertex_buffers(&self) -> &[VertexBuffer] {
        &self.vertex_buffers
    }

    /// Polygon groups, keyed by name.
    pub fn shapes(&self) -> &IndexGroup<Shape> {
        &self.shapes
    }

    /// Materials, keyed by name.
    pub fn materials(&self) -> &IndexGroup<Material> {
        &self.materials
    }

    /// Model parameters, keyed by name.
    pub fn params(&self) -> &IndexGroup<ModelParam> {
        &self.params
    }

    pub(crate) fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }

    /// The vertex buffer a shape draws from.
    pub fn vertex_buffer_for(&self, shape: &Shape) -> Option<&VertexBuffer> {
        self.vertex_buffers.get(shape.buffer_index())
    }

    /// The material a shape is rendered with.
    pub fn material_for(&self, shape: &Shape) -> Option<&Material> {
        self.materials.entry(shape.material_index()).map(|e| &e.value)
    }
}
