//! Common utilities for Latte.
//!
//! This crate provides the foundational types used across all Latte crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`Endian`] - Byte-order selection, including BOM detection
//! - [`Error`] / [`Result`] - Shared low-level error type

mod endian;
mod error;
mod reader;

pub use endian::Endian;
pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
