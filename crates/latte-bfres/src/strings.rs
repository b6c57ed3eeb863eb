//! String pool resolution.
//!
//! All names in a BFRES file live in a single string table and are referenced
//! by offset, each entry a length-prefixed, null-terminated run with the
//! reference pointing at the first character. The same offset is referenced
//! from many places (index group nodes, section headers, shader variables), so
//! resolved strings are cached per parse and shared as [`Arc<str>`].

use std::sync::Arc;

use latte_common::BinaryReader;
use rustc_hash::FxHashMap;

use crate::offset::Offset;
use crate::{Error, Result};

/// Cache of resolved string-table offsets, living for one parse pass.
#[derive(Debug, Default)]
pub struct StringPool {
    cache: FxHashMap<u64, Arc<str>>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct offsets resolved so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no strings have been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Resolve the text at an absolute string-table offset.
    ///
    /// The reader position is saved and restored around the lookup; repeated
    /// resolutions of the same offset share one allocation.
    pub fn resolve(&mut self, reader: &mut BinaryReader<'_>, offset: u64) -> Result<Arc<str>> {
        if let Some(text) = self.cache.get(&offset) {
            return Ok(Arc::clone(text));
        }

        let saved = reader.position();
        reader.seek(offset as usize);
        let result = reader.read_cstring();
        reader.seek(saved);

        let text = result.map_err(|source| Error::MalformedString { offset, source })?;
        let text: Arc<str> = Arc::from(text);
        self.cache.insert(offset, Arc::clone(&text));
        Ok(text)
    }
}

/// Read a self-relative name reference and resolve it through the pool.
pub(crate) fn read_name(
    reader: &mut BinaryReader<'_>,
    strings: &mut StringPool,
) -> Result<Arc<str>> {
    let offset = Offset::read(reader)?;
    let target = offset.require("name")?;
    strings.resolve(reader, target)
}
