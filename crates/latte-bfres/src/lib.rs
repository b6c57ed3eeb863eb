//! BFRES (Binary caFe RESource) parser for Wii U model containers.
//!
//! BFRES files hold everything a model needs at runtime: geometry, materials,
//! textures, and animation data, all cross-linked through self-relative
//! offsets and a shared string table. This crate reads a file into a
//! navigable document; it does not decode texture pixels or animations.
//!
//! # File Format
//!
//! A BFRES file starts with a fixed header:
//! - 4 bytes: Magic ("FRES")
//! - 4 bytes: Version
//! - 2 bytes: Byte order mark (0xFEFF big-endian, 0xFFFE little-endian)
//! - 2 bytes: Header size
//! - 4 bytes: File length
//! - 4 bytes: Alignment
//! - 4 bytes: File name offset
//! - 8 bytes: String table length and offset
//! - 12 index group offsets plus 12 entry counts
//!
//! Index groups are on-disk radix trees mapping names to offsets; group 0
//! holds the models (FMDL), group 1 the textures (FTEX), and group 11 the
//! embedded files. Every offset in the file is relative to the position of
//! the offset field itself.
//!
//! # Example
//!
//! ```no_run
//! use latte_bfres::BfresFile;
//!
//! // Read a container, decompressing Yaz0 on the fly.
//! let file = BfresFile::open("course_model.szs")?;
//! println!("{}: {} models, {} textures",
//!     file.name(), file.models().len(), file.textures().len());
//!
//! // Walk a model's shapes and their resolved textures.
//! for model in file.models() {
//!     for shape in model.value.shapes() {
//!         let material = model.value.material_for(&shape.value);
//!         println!("  {} ({} LODs)", shape.name, shape.value.lods().len());
//!         if let Some(material) = material {
//!             for sampler in material.samplers() {
//!                 println!("    {} -> {}", sampler.name(), sampler.texture_name());
//!             }
//!         }
//!     }
//! }
//!
//! // Hand a texture to an external converter as a GTX container.
//! if let Some(texture) = file.textures().iter().next() {
//!     let gtx = texture.value.to_gtx()?;
//!     std::fs::write("texture.gtx", gtx)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod index_group;
mod offset;
pub mod sections;
mod strings;

pub use error::{Error, Result};
pub use file::{is_bfres, BfresFile, MAGIC};
pub use index_group::{Entry, IndexGroup};
pub use offset::Offset;
pub use strings::StringPool;

// Re-export commonly used types at crate root
pub use sections::{Material, Model, PixelFormat, Shape, Texture, VertexBuffer};
