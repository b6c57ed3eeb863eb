//! GTX (Gfx2) texture container writing for Wii U GX2 surfaces.
//!
//! GTX is the standalone container Wii U tooling exchanges GPU textures in: a
//! 32-byte file header followed by tagged blocks, each introduced by a 32-byte
//! block header. A texture consists of a surface register block, the base
//! image payload, the mipmap payload, and an end-of-file block. Everything is
//! big-endian and the pixel data stays in its tiled GPU layout; this crate
//! only rebuilds the container, it never touches pixels.
//!
//! # Example
//!
//! ```
//! use latte_gtx::{encode, Gx2Surface};
//!
//! let surface = Gx2Surface {
//!     dim: 1,
//!     width: 4,
//!     height: 4,
//!     depth: 1,
//!     mip_count: 1,
//!     format: 0x1A,
//!     usage: 1,
//!     image_size: 64,
//!     ..Gx2Surface::default()
//! };
//! let gtx = encode(&surface, &[0u8; 64], &[])?;
//! assert_eq!(&gtx[0..4], b"Gfx2");
//! # Ok::<(), latte_gtx::Error>(())
//! ```

mod block;
mod encode;
mod error;
mod surface;

pub use block::{BlockHeader, FileHeader};
pub use encode::encode;
pub use error::{Error, Result};
pub use surface::Gx2Surface;

/// GTX file magic bytes.
pub const GFX2_MAGIC: &[u8; 4] = b"Gfx2";

/// GTX block magic bytes.
pub const BLOCK_MAGIC: &[u8; 4] = b"BLK{";
