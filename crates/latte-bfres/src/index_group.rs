//! Index groups, the name-keyed collections of the BFRES format.
//!
//! On disk an index group is a binary radix tree for fast named lookup: a
//! byte-length and node-count header, then `count + 1` fixed-size nodes of
//! search value, left/right child indices, name offset, and data offset. The
//! first node is the tree root and carries no data. In memory the tree is
//! easier to handle as an ordered map, so entries are kept in on-disk order
//! next to a hash index over their names; the radix navigation fields are
//! preserved but never walked.

use std::sync::Arc;

use latte_common::BinaryReader;
use log::warn;
use rustc_hash::FxHashMap;

use crate::offset::Offset;
use crate::strings::{read_name, StringPool};
use crate::Result;

/// Byte size of one on-disk node.
const NODE_SIZE: usize = 16;

/// One named entry of an index group.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// Radix tree search value (bit index, `0xFFFFFFFF` for the root).
    pub search_value: u32,
    /// Radix tree left child.
    pub left_index: u16,
    /// Radix tree right child.
    pub right_index: u16,
    /// Entry name, resolved from the string table.
    pub name: Arc<str>,
    /// Decoded entry data.
    pub value: T,
}

/// A name-keyed, order-preserving collection decoded from an index group.
#[derive(Debug, Clone)]
pub struct IndexGroup<T> {
    entries: Vec<Entry<T>>,
    by_name: FxHashMap<Arc<str>, usize>,
}

impl<T> Default for IndexGroup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }
}

impl<T> IndexGroup<T> {
    /// Parse an index group at the reader's current position.
    ///
    /// `decode` is invoked once per entry with the reader seeked to the
    /// entry's data offset; the position is restored between entries, so
    /// decoders are free to jump around. Entries whose name was already seen
    /// keep the first occurrence and are skipped with a warning.
    pub fn parse<F>(
        reader: &mut BinaryReader<'_>,
        strings: &mut StringPool,
        mut decode: F,
    ) -> Result<Self>
    where
        F: FnMut(&mut BinaryReader<'_>, &mut StringPool) -> Result<T>,
    {
        let _length_in_bytes = reader.read_u32()?;
        let node_count = reader.read_u32()?;

        // The root node holds no name or data.
        reader.advance(NODE_SIZE);

        let mut entries = Vec::with_capacity(node_count as usize);
        let mut by_name: FxHashMap<Arc<str>, usize> = FxHashMap::default();

        for _ in 0..node_count {
            let search_value = reader.read_u32()?;
            let left_index = reader.read_u16()?;
            let right_index = reader.read_u16()?;
            let name = read_name(reader, strings)?;
            let data_offset = Offset::read(reader)?;

            if by_name.contains_key(name.as_ref()) {
                warn!("duplicate index group entry '{name}', keeping the first");
                continue;
            }

            let target = data_offset.require("index group entry data")?;
            let saved = reader.position();
            reader.seek(target as usize);
            let value = decode(reader, strings)?;
            reader.seek(saved);

            by_name.insert(Arc::clone(&name), entries.len());
            entries.push(Entry {
                search_value,
                left_index,
                right_index,
                name,
                value,
            });
        }

        Ok(Self { entries, by_name })
    }

    /// Number of entries (duplicates collapsed).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up an entry's value by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index_of(name).map(|i| &self.entries[i].value)
    }

    /// Position of a named entry in on-disk order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Access an entry by its position in on-disk order.
    pub fn entry(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    /// Iterate entries in on-disk order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }

    /// Iterate entry values mutably, in on-disk order.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|e| &mut e.value)
    }

    /// Iterate entry names in on-disk order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_ref())
    }
}

impl<'a, T> IntoIterator for &'a IndexGroup<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latte_common::Endian;

    /// Assemble a group of `names` whose entry data is one big-endian u32.
    fn build_group(entries: &[(&str, u32)]) -> Vec<u8> {
        let node_count = entries.len();
        let header_len = 8 + NODE_SIZE * (node_count + 1);
        let mut out = Vec::new();

        out.extend_from_slice(&(header_len as u32).to_be_bytes());
        out.extend_from_slice(&(node_count as u32).to_be_bytes());

        // Root node.
        out.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&[0u8; 8]);

        // Strings and data land after the nodes.
        let mut tail: Vec<u8> = Vec::new();
        let tail_base = header_len;

        for (i, (name, value)) in entries.iter().enumerate() {
            let node_base = 8 + NODE_SIZE * (i + 1);
            out.extend_from_slice(&(i as u32).to_be_bytes());
            out.extend_from_slice(&[0u8; 4]);

            let name_pos = tail_base + tail.len();
            tail.extend_from_slice(name.as_bytes());
            tail.push(0);
            let name_field = node_base + 8;
            out.extend_from_slice(&((name_pos - name_field) as u32).to_be_bytes());

            let data_pos = tail_base + tail.len();
            tail.extend_from_slice(&value.to_be_bytes());
            let data_field = node_base + 12;
            out.extend_from_slice(&((data_pos - data_field) as u32).to_be_bytes());
        }

        out.extend_from_slice(&tail);
        out
    }

    fn parse_group(data: &[u8]) -> IndexGroup<u32> {
        let mut reader = BinaryReader::new(data, Endian::Big);
        let mut strings = StringPool::new();
        IndexGroup::parse(&mut reader, &mut strings, |r, _| Ok(r.read_u32()?)).unwrap()
    }

    #[test]
    fn test_entries_keep_disk_order() {
        let data = build_group(&[("zeta", 1), ("alpha", 2), ("mid", 3)]);
        let group = parse_group(&data);

        assert_eq!(group.len(), 3);
        let names: Vec<&str> = group.names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(group.get("alpha"), Some(&2));
        assert_eq!(group.index_of("mid"), Some(2));
        assert_eq!(group.get("missing"), None);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let data = build_group(&[("body", 7), ("body", 9), ("tail", 3)]);
        let group = parse_group(&data);

        assert_eq!(group.len(), 2);
        assert_eq!(group.get("body"), Some(&7));
        assert_eq!(group.index_of("tail"), Some(1));
    }

    #[test]
    fn test_empty_group() {
        let data = build_group(&[]);
        let group = parse_group(&data);

        assert!(group.is_empty());
        assert_eq!(group.iter().count(), 0);
    }

    #[test]
    fn test_reader_position_advances_past_nodes() {
        let data = build_group(&[("one", 1)]);
        let mut reader = BinaryReader::new(&data, Endian::Big);
        let mut strings = StringPool::new();
        let _ = IndexGroup::parse(&mut reader, &mut strings, |r, _| Ok(r.read_u32()?)).unwrap();

        assert_eq!(reader.position(), 8 + 2 * NODE_SIZE);
    }
}
