//! Latte - Wii U BFRES resource inspection and extraction library.
//!
//! This crate provides a unified interface to the Latte library ecosystem
//! for working with Wii U model containers.
//!
//! # Crates
//!
//! - [`latte_common`] - Common utilities (endian-aware binary reading)
//! - [`latte_yaz0`] - Yaz0 (`.szs`) decompression
//! - [`latte_bfres`] - BFRES (`.bfres`) resource container parsing
//! - [`latte_gtx`] - GTX (`.gtx`) texture container writing
//!
//! # Example
//!
//! ```no_run
//! use latte::prelude::*;
//!
//! // Open a container, transparently decompressing Yaz0.
//! let file = BfresFile::open("course_model.szs")?;
//!
//! // Walk the models and their geometry.
//! for model in file.models() {
//!     println!("{}: {} shapes", model.name, model.value.shapes().len());
//! }
//!
//! // Repackage each texture as a GTX file for external conversion.
//! for texture in file.textures() {
//!     let gtx = texture.value.to_gtx()?;
//!     std::fs::write(format!("{}.gtx", texture.name), gtx)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use latte_bfres as bfres;
pub use latte_common as common;
pub use latte_gtx as gtx;
pub use latte_yaz0 as yaz0;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use latte_bfres::{
        BfresFile, IndexGroup, Material, Model, PixelFormat, Shape, Texture, VertexBuffer,
    };
    pub use latte_common::{BinaryReader, Endian};
    pub use latte_gtx::Gx2Surface;
    pub use latte_yaz0::{decompress, is_yaz0};
}

// Re-export commonly used types at the crate root
pub use latte_bfres::BfresFile;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
