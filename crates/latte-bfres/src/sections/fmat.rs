//! FMAT material sections.
//!
//! An FMAT section carries everything a shape needs besides geometry: render
//! state parameters, the shader archive binding with its uniform values, and
//! the sampler table pairing texture names with shader attribute slots.
//! Texture references are stored by name; the resolution against the
//! document's texture collection happens in a later pass, once all FTEX
//! sections are decoded.

use std::sync::Arc;

use latte_common::{BinaryReader, Endian};

use crate::index_group::IndexGroup;
use crate::offset::Offset;
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// Value of a render state parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderParamValue {
    /// Eight raw bytes of unknown meaning.
    Opaque([u8; 8]),
    /// Two floats.
    Vec2([f32; 2]),
    /// A reference into the string table.
    Text(Arc<str>),
}

/// A render state parameter.
#[derive(Debug, Clone)]
pub struct RenderParam {
    /// Parameter name.
    name: Arc<str>,
    /// Parameter value.
    value: RenderParamValue,
}

impl RenderParam {
    fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.read_u16()?;
        let kind = reader.read_u8()?;
        reader.read_u8()?;
        let name = read_name(reader, strings)?;
        let value = match kind {
            0x00 => {
                let bytes = reader.read_bytes(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                RenderParamValue::Opaque(raw)
            }
            0x01 => RenderParamValue::Vec2([reader.read_f32()?, reader.read_f32()?]),
            0x02 => RenderParamValue::Text(read_name(reader, strings)?),
            value => {
                return Err(Error::UnsupportedParamType {
                    name: name.to_string(),
                    value,
                })
            }
        };
        Ok(Self { name, value })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value.
    pub fn value(&self) -> &RenderParamValue {
        &self.value
    }
}

/// Value of a material uniform parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialParamValue {
    /// A 32-bit integer.
    Int(i32),
    /// A single float.
    Float(f32),
    /// Two floats.
    Vec2([f32; 2]),
    /// Three floats.
    Vec3([f32; 3]),
    /// Four floats.
    Vec4([f32; 4]),
    /// A 2x3 matrix in row order.
    Mat2x3([f32; 6]),
}

/// A material uniform parameter with its decoded value.
#[derive(Debug, Clone)]
pub struct MaterialParam {
    /// Parameter name.
    name: Arc<str>,
    /// Position of this parameter in the material's parameter table.
    index: u16,
    /// Decoded value.
    value: MaterialParamValue,
}

impl MaterialParam {
    /// Read one parameter description and pull its value out of the
    /// material's parameter data blob.
    fn read(
        reader: &mut BinaryReader<'_>,
        strings: &mut StringPool,
        data: &[u8],
        endian: Endian,
    ) -> Result<Self> {
        let kind = reader.read_u8()?;
        let _size = reader.read_u8()?;
        let value_offset = reader.read_u16()?;
        reader.read_u32()?;
        reader.read_u32()?;
        let index = reader.read_u16()?;
        reader.read_u16()?;
        let name = read_name(reader, strings)?;

        let mut values = BinaryReader::new_at(data, usize::from(value_offset), endian);
        let value = match kind {
            0x04 => MaterialParamValue::Int(values.read_i32()?),
            0x0c => MaterialParamValue::Float(values.read_f32()?),
            0x0d => MaterialParamValue::Vec2(read_f32_array(&mut values)?),
            0x0e => MaterialParamValue::Vec3(read_f32_array(&mut values)?),
            0x0f => MaterialParamValue::Vec4(read_f32_array(&mut values)?),
            0x1e => MaterialParamValue::Mat2x3(read_f32_array(&mut values)?),
            value => {
                return Err(Error::UnsupportedParamType {
                    name: name.to_string(),
                    value,
                })
            }
        };

        Ok(Self { name, index, value })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this parameter in the material's parameter table.
    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Decoded value.
    pub fn value(&self) -> &MaterialParamValue {
        &self.value
    }
}

fn read_f32_array<const N: usize>(reader: &mut BinaryReader<'_>) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = reader.read_f32()?;
    }
    Ok(out)
}

/// Shader binding of a material.
///
/// Names the shader archive and shading model the material uses, and maps
/// vertex attributes and pixel inputs to shader variables. All mapped values
/// are plain strings.
#[derive(Debug, Clone)]
pub struct ShaderControl {
    shader_archive: Arc<str>,
    shading_model: Arc<str>,
    vertex_inputs: IndexGroup<Arc<str>>,
    pixel_inputs: IndexGroup<Arc<str>>,
    params: IndexGroup<Arc<str>>,
}

impl ShaderControl {
    fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        let shader_archive = read_name(reader, strings)?;
        let shading_model = read_name(reader, strings)?;
        reader.read_u32()?;
        let _vertex_input_count = reader.read_u8()?;
        let _pixel_input_count = reader.read_u8()?;
        let _param_count = reader.read_u16()?;
        let vertex_input_group = Offset::read(reader)?;
        let pixel_input_group = Offset::read(reader)?;
        let param_group = Offset::read(reader)?;

        reader.seek(vertex_input_group.require("vertex shader input group")? as usize);
        let vertex_inputs = IndexGroup::parse(reader, strings, resolve_at_position)?;

        reader.seek(pixel_input_group.require("pixel shader input group")? as usize);
        let pixel_inputs = IndexGroup::parse(reader, strings, resolve_at_position)?;

        reader.seek(param_group.require("shader parameter group")? as usize);
        let params = IndexGroup::parse(reader, strings, resolve_at_position)?;

        Ok(Self {
            shader_archive,
            shading_model,
            vertex_inputs,
            pixel_inputs,
            params,
        })
    }

    /// Name of the shader archive.
    pub fn shader_archive(&self) -> &str {
        &self.shader_archive
    }

    /// Name of the shading model within the archive.
    pub fn shading_model(&self) -> &str {
        &self.shading_model
    }

    /// Vertex attribute names mapped to vertex shader variables.
    pub fn vertex_inputs(&self) -> &IndexGroup<Arc<str>> {
        &self.vertex_inputs
    }

    /// Pixel input names mapped to pixel shader variables.
    pub fn pixel_inputs(&self) -> &IndexGroup<Arc<str>> {
        &self.pixel_inputs
    }

    /// Shader uniform names mapped to their string values.
    pub fn params(&self) -> &IndexGroup<Arc<str>> {
        &self.params
    }
}

/// Group decoder for entries whose data is a bare string in the string table.
fn resolve_at_position(
    reader: &mut BinaryReader<'_>,
    strings: &mut StringPool,
) -> Result<Arc<str>> {
    let position = reader.position() as u64;
    strings.resolve(reader, position)
}

/// A texture binding of a material.
///
/// Pairs a shader sampler slot with the name of the FTEX section it reads
/// from. The index into the document's texture collection is filled in by the
/// post-parse resolution pass.
#[derive(Debug, Clone)]
pub struct Sampler {
    /// Sampler slot name (shader attribute, `_a0` and friends).
    name: Arc<str>,
    /// Name of the referenced texture.
    texture_name: Arc<str>,
    /// Position of the referenced texture in the document.
    texture_index: Option<usize>,
}

impl Sampler {
    /// Sampler slot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the referenced texture.
    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    /// Position of the referenced texture in the document's texture
    /// collection. Always present once the document has finished parsing.
    #[inline]
    pub fn texture_index(&self) -> Option<usize> {
        self.texture_index
    }

    pub(crate) fn set_texture_index(&mut self, index: usize) {
        self.texture_index = Some(index);
    }
}

/// Sampler state bound to a shader attribute slot. Only the name and slot
/// index survive decoding; the filtering state is not interpreted.
struct AttributeSelector {
    name: Arc<str>,
}

impl AttributeSelector {
    fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        // 16 bytes of sampler state (wrap modes, filtering, LOD bias).
        reader.read_bytes(16)?;
        let name = read_name(reader, strings)?;
        reader.read_u32()?;
        Ok(Self { name })
    }
}

/// An FMAT section: render state, shader binding, and texture samplers.
#[derive(Debug, Clone)]
pub struct Material {
    /// Material name.
    name: Arc<str>,
    /// Position of this material in the model's FMAT index group.
    index: u16,
    /// Render state parameters, keyed by name.
    render_params: IndexGroup<RenderParam>,
    /// Shader binding.
    shader_control: ShaderControl,
    /// Uniform parameters, keyed by name.
    material_params: IndexGroup<MaterialParam>,
    /// Texture bindings in slot order.
    samplers: Vec<Sampler>,
}

impl Material {
    /// Read an FMAT section at the reader's current position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, strings: &mut StringPool) -> Result<Self> {
        reader.expect_magic(b"FMAT")?;
        let name = read_name(reader, strings)?;
        reader.read_u32()?;
        let index = reader.read_u16()?;
        let _render_param_count = reader.read_u16()?;
        let texture_selector_count = reader.read_u8()?;
        let _attribute_selector_count = reader.read_u8()?;
        let _material_param_count = reader.read_u16()?;
        let material_param_data_size = reader.read_u32()?;
        reader.read_u32()?;
        let render_param_group = Offset::read(reader)?;
        let _material_structure = Offset::read(reader)?;
        let shader_control_offset = Offset::read(reader)?;
        let texture_selector_array = Offset::read(reader)?;
        let _attribute_selector_array = Offset::read(reader)?;
        let attribute_selector_group = Offset::read(reader)?;
        let _material_param_array = Offset::read(reader)?;
        let material_param_group = Offset::read(reader)?;
        let material_param_data = Offset::read(reader)?;
        let _shadow_param_group = Offset::read(reader)?;
        let _unknown = Offset::read(reader)?;

        reader.seek(render_param_group.require("render parameter group")? as usize);
        let render_params = IndexGroup::parse(reader, strings, RenderParam::read)?;

        reader.seek(shader_control_offset.require("shader control")? as usize);
        let shader_control = ShaderControl::read(reader, strings)?;

        // Pull the parameter data blob first so values decode in one pass.
        let param_data: &[u8] = match material_param_data.target() {
            Some(target) if material_param_data_size > 0 => {
                reader.seek(target as usize);
                reader.read_bytes(material_param_data_size as usize)?
            }
            _ => &[],
        };

        reader.seek(material_param_group.require("material parameter group")? as usize);
        let endian = reader.endian();
        let material_params = IndexGroup::parse(reader, strings, |r, s| {
            MaterialParam::read(r, s, param_data, endian)
        })?;

        let mut texture_names = Vec::with_capacity(usize::from(texture_selector_count));
        if texture_selector_count > 0 {
            reader.seek(texture_selector_array.require("texture selector array")? as usize);
            for _ in 0..texture_selector_count {
                let texture_name = read_name(reader, strings)?;
                let _ftex = Offset::read(reader)?;
                texture_names.push(texture_name);
            }
        }

        let attribute_selectors = match attribute_selector_group.target() {
            Some(target) => {
                reader.seek(target as usize);
                IndexGroup::parse(reader, strings, AttributeSelector::read)?
            }
            None => IndexGroup::default(),
        };

        if texture_names.len() != attribute_selectors.len() {
            return Err(Error::SamplerCountMismatch {
                material: name.to_string(),
                selectors: texture_names.len(),
                samplers: attribute_selectors.len(),
            });
        }
        let samplers = texture_names
            .into_iter()
            .zip(&attribute_selectors)
            .map(|(texture_name, entry)| Sampler {
                name: Arc::clone(&entry.value.name),
                texture_name,
                texture_index: None,
            })
            .collect();

        Ok(Self {
            name,
            index,
            render_params,
            shader_control,
            material_params,
            samplers,
        })
    }

    /// Material name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this material in the model's FMAT index group.
    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Render state parameters, keyed by name.
    pub fn render_params(&self) -> &IndexGroup<RenderParam> {
        &self.render_params
    }

    /// Shader binding.
    pub fn shader_control(&self) -> &ShaderControl {
        &self.shader_control
    }

    /// Uniform parameters, keyed by name.
    pub fn material_params(&self) -> &IndexGroup<MaterialParam> {
        &self.material_params
    }

    /// Texture bindings in slot order.
    pub fn samplers(&self) -> &[Sampler] {
        &self.samplers
    }

    pub(crate) fn samplers_mut(&mut self) -> &mut [Sampler] {
        &mut self.samplers
    }

    /// Look up a texture binding by sampler slot name.
    pub fn sampler(&self, name: &str) -> Option<&Sampler> {
        self.samplers.iter().find(|s| s.name.as_ref() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_param_values_from_blob() {
        let mut blob = Vec::new();
        blob.extend_from_slice(&(-5i32).to_be_bytes());
        for v in [1.0f32, 2.0, 3.0] {
            blob.extend_from_slice(&v.to_bits().to_be_bytes());
        }

        // kind, size, value offset, two reserved words, index twice, name.
        let mut entry = Vec::new();
        entry.push(0x0eu8);
        entry.push(12);
        entry.extend_from_slice(&4u16.to_be_bytes());
        entry.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        entry.extend_from_slice(&0u32.to_be_bytes());
        entry.extend_from_slice(&3u16.to_be_bytes());
        entry.extend_from_slice(&3u16.to_be_bytes());
        let name_field = entry.len();
        let name_pos = entry.len() + 4;
        entry.extend_from_slice(&((name_pos - name_field) as u32).to_be_bytes());
        entry.extend_from_slice(b"albedo_color\0");

        let mut reader = BinaryReader::new(&entry, Endian::Big);
        let mut strings = StringPool::new();
        let param =
            MaterialParam::read(&mut reader, &mut strings, &blob, Endian::Big).unwrap();

        assert_eq!(param.name(), "albedo_color");
        assert_eq!(param.index(), 3);
        assert_eq!(param.value(), &MaterialParamValue::Vec3([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_material_param_unknown_kind() {
        let mut entry = Vec::new();
        entry.push(0x42u8);
        entry.push(4);
        entry.extend_from_slice(&0u16.to_be_bytes());
        entry.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        entry.extend_from_slice(&0u32.to_be_bytes());
        entry.extend_from_slice(&0u16.to_be_bytes());
        entry.extend_from_slice(&0u16.to_be_bytes());
        let name_field = entry.len();
        let name_pos = entry.len() + 4;
        entry.extend_from_slice(&((name_pos - name_field) as u32).to_be_bytes());
        entry.extend_from_slice(b"mystery\0");

        let mut reader = BinaryReader::new(&entry, Endian::Big);
        let mut strings = StringPool::new();
        let err = MaterialParam::read(&mut reader, &mut strings, &[0u8; 4], Endian::Big)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::UnsupportedParamType { value: 0x42, .. }
        ));
    }

    #[test]
    fn test_material_param_value_out_of_blob() {
        let mut entry = Vec::new();
        entry.push(0x0cu8);
        entry.push(4);
        entry.extend_from_slice(&100u16.to_be_bytes());
        entry.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        entry.extend_from_slice(&0u32.to_be_bytes());
        entry.extend_from_slice(&0u16.to_be_bytes());
        entry.extend_from_slice(&0u16.to_be_bytes());
        let name_field = entry.len();
        let name_pos = entry.len() + 4;
        entry.extend_from_slice(&((name_pos - name_field) as u32).to_be_bytes());
        entry.extend_from_slice(b"clipped\0");

        let mut reader = BinaryReader::new(&entry, Endian::Big);
        let mut strings = StringPool::new();
        let err = MaterialParam::read(&mut reader, &mut strings, &[0u8; 4], Endian::Big)
            .unwrap_err();

        assert!(matches!(err, Error::Common(_)));
    }

    #[test]
    fn test_render_param_vec2() {
        let mut entry = Vec::new();
        entry.extend_from_slice(&0u16.to_be_bytes());
        entry.push(0x01);
        entry.push(0x00);
        let name_field = entry.len();
        // Name lands after the two floats.
        let name_pos = entry.len() + 4 + 8;
        entry.extend_from_slice(&((name_pos - name_field) as u32).to_be_bytes());
        entry.extend_from_slice(&0.5f32.to_bits().to_be_bytes());
        entry.extend_from_slice(&1.5f32.to_bits().to_be_bytes());
        entry.extend_from_slice(b"depth_bias\0");

        let mut reader = BinaryReader::new(&entry, Endian::Big);
        let mut strings = StringPool::new();
        let param = RenderParam::read(&mut reader, &mut strings).unwrap();

        assert_eq!(param.name(), "depth_bias");
        assert_eq!(param.value(), &RenderParamValue::Vec2([0.5, 1.5]));
    }
}
