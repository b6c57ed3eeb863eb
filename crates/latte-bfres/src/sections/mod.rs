//! BFRES section decoders.
//!
//! This module contains the structures for parsing the sections a BFRES
//! container's root index groups point at.
//!
//! # Structure Overview
//!
//! A BFRES file's section graph looks like this:
//! - [`Model`] (FMDL): one renderable model
//!   - [`VertexBuffer`] (FVTX): packed per-vertex attribute data
//!   - [`Shape`] (FSHP): polygon groups with per-LOD index buffers
//!   - [`Material`] (FMAT): render state, shader bindings, and samplers
//! - [`Texture`] (FTEX): a GX2 surface description plus its encoded payload
//! - [`EmbeddedFile`]: an opaque byte blob carried inside the container
//!
//! Every section is reached through self-relative offsets and names its
//! children through the shared string table, so all decoders take the
//! document-wide [`StringPool`](crate::StringPool) alongside the reader.

mod embedded;
mod fmat;
mod fmdl;
mod fshp;
mod ftex;
mod fvtx;

pub use embedded::EmbeddedFile;
pub use fmat::{
    Material, MaterialParam, MaterialParamValue, RenderParam, RenderParamValue, Sampler,
    ShaderControl,
};
pub use fmdl::{Model, ModelParam};
pub use fshp::{IndexFormat, LodModel, PrimitiveType, Shape, VisibilityGroup};
pub use ftex::{PixelFormat, Texture};
pub use fvtx::{AttribFormat, Attribute, DataBuffer, VertexBuffer};
