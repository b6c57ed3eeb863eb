//! BFRES container parsing.
//!
//! A BFRES file opens with a fixed header naming the file and locating the
//! string table, followed by twelve root index group offsets. Group 0 holds
//! the models, group 1 the textures, and group 11 the embedded files; the
//! groups in between carry animation data this parser does not decode.
//! Everything else in the file is reached from those groups through
//! self-relative offsets.
//!
//! Parsing is a single pass over the buffer plus one resolution pass at the
//! end: materials reference textures by name, and every such reference must
//! name a texture present in the document.

use std::path::Path;
use std::sync::Arc;

use latte_common::{BinaryReader, Endian};

use crate::index_group::IndexGroup;
use crate::offset::Offset;
use crate::sections::{EmbeddedFile, Model, Sampler, Texture};
use crate::strings::{read_name, StringPool};
use crate::{Error, Result};

/// Magic bytes opening a BFRES file.
pub const MAGIC: &[u8; 4] = b"FRES";

/// Number of root index groups in the header.
const INDEX_GROUP_COUNT: usize = 12;

/// Root index group holding FMDL sections.
const MODEL_GROUP: usize = 0;
/// Root index group holding FTEX sections.
const TEXTURE_GROUP: usize = 1;
/// Root index group holding embedded files.
const EMBEDDED_GROUP: usize = 11;

/// A parsed BFRES container.
///
/// The document owns every decoded section. All collections preserve on-disk
/// order and are keyed by name; cross-references between them were resolved
/// during parsing, so lookups cannot dangle.
#[derive(Debug, Clone)]
pub struct BfresFile {
    /// File name stored in the header.
    name: Arc<str>,
    /// The four version bytes of the header.
    version: [u8; 4],
    /// Byte order of the file.
    endian: Endian,
    /// Models, keyed by name.
    models: IndexGroup<Model>,
    /// Textures, keyed by name.
    textures: IndexGroup<Texture>,
    /// Embedded files, keyed by name.
    embedded_files: IndexGroup<EmbeddedFile>,
}

impl BfresFile {
    /// Parse a BFRES container from a fully loaded byte buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        // The byte order mark sits at 0x08, before any multi-byte field.
        let bom = match data.get(8..10) {
            Some(bom) => [bom[0], bom[1]],
            None => {
                return Err(latte_common::Error::UnexpectedEof {
                    offset: 8,
                    needed: 2,
                    available: data.len().saturating_sub(8),
                }
                .into())
            }
        };
        let endian = Endian::from_bom(bom).ok_or(Error::InvalidByteOrder { bom })?;

        let mut reader = BinaryReader::new(data, endian);
        let mut strings = StringPool::new();

        reader.expect_magic(MAGIC)?;
        let version_bytes = reader.read_bytes(4)?;
        let version = [
            version_bytes[0],
            version_bytes[1],
            version_bytes[2],
            version_bytes[3],
        ];
        reader.read_u16()?;
        reader.read_u16()?;
        let _file_length = reader.read_u32()?;
        let _alignment = reader.read_u32()?;
        let name = read_name(&mut reader, &mut strings)?;
        let _string_table_length = reader.read_u32()?;
        let _string_table = Offset::read(&mut reader)?;

        let mut group_offsets = Vec::with_capacity(INDEX_GROUP_COUNT);
        for _ in 0..INDEX_GROUP_COUNT {
            group_offsets.push(Offset::read(&mut reader)?);
        }
        for _ in 0..INDEX_GROUP_COUNT {
            reader.read_u16()?;
        }

        let mut models = IndexGroup::default();
        let mut textures = IndexGroup::default();
        let mut embedded_files = IndexGroup::default();

        for (index, offset) in group_offsets.iter().enumerate() {
            let target = match offset.target() {
                Some(target) => target,
                None => continue,
            };
            reader.seek(target as usize);
            match index {
                MODEL_GROUP => {
                    models = IndexGroup::parse(&mut reader, &mut strings, Model::read)
                        .map_err(|e| Error::in_section("FMDL", target, e))?;
                }
                TEXTURE_GROUP => {
                    textures = IndexGroup::parse(&mut reader, &mut strings, Texture::read)
                        .map_err(|e| Error::in_section("FTEX", target, e))?;
                }
                EMBEDDED_GROUP => {
                    embedded_files =
                        IndexGroup::parse(&mut reader, &mut strings, EmbeddedFile::read)
                            .map_err(|e| Error::in_section("embedded files", target, e))?;
                }
                // Animation and scene groups, not decoded.
                _ => {}
            }
        }

        let mut file = Self {
            name,
            version,
            endian,
            models,
            textures,
            embedded_files,
        };
        file.resolve_texture_references()?;
        Ok(file)
    }

    /// Read a BFRES file from disk, decompressing Yaz0 containers on the fly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        if latte_yaz0::is_yaz0(&data) {
            let decompressed = latte_yaz0::decompress(&data)?;
            Self::parse(&decompressed)
        } else {
            Self::parse(&data)
        }
    }

    /// Point every material sampler at its texture's position in the
    /// document. A sampler naming an absent texture fails the whole parse.
    fn resolve_texture_references(&mut self) -> Result<()> {
        let textures = &self.textures;
        for model in self.models.values_mut() {
            for material in model.materials_mut() {
                let material_name = material.name().to_string();
                for sampler in material.samplers_mut() {
                    match textures.index_of(sampler.texture_name()) {
                        Some(index) => sampler.set_texture_index(index),
                        None => {
                            return Err(Error::DanglingTextureReference {
                                material: material_name,
                                sampler: sampler.name().to_string(),
                                texture: sampler.texture_name().to_string(),
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// File name stored in the header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The four version bytes of the header.
    #[inline]
    pub fn version(&self) -> [u8; 4] {
        self.version
    }

    /// Byte order of the file.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Models, keyed by name.
    pub fn models(&self) -> &IndexGroup<Model> {
        &self.models
    }

    /// Textures, keyed by name.
    pub fn textures(&self) -> &IndexGroup<Texture> {
        &self.textures
    }

    /// Embedded files, keyed by name.
    pub fn embedded_files(&self) -> &IndexGroup<EmbeddedFile> {
        &self.embedded_files
    }

    /// The texture a sampler resolves to.
    ///
    /// Resolution happened at parse time, so this is a plain index lookup.
    pub fn sampler_texture(&self, sampler: &Sampler) -> Option<&Texture> {
        self.textures
            .entry(sampler.texture_index()?)
            .map(|e| &e.value)
    }
}

/// Check whether a buffer starts with the BFRES magic.
pub fn is_bfres(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}
