//! Offset view over document text.
//!
//! Offsets that cross the crate boundary count UTF-16 code units, the unit
//! the stored highlights were written in by the web client. Matching itself
//! runs over `char`s so a surrogate pair is never split. [`CharText`] decodes
//! a document once and translates between the two, and to byte ranges for
//! slicing `&str`.

use std::ops::Range;

/// A borrowed document decoded into characters, with the byte offset and
/// the UTF-16 offset of every character boundary kept alongside.
#[derive(Debug, Clone)]
pub struct CharText<'a> {
    source: &'a str,
    chars: Vec<char>,
    /// Byte offset of each char, plus `source.len()` as a trailing sentinel.
    bytes: Vec<usize>,
    /// UTF-16 offset of each char, plus the UTF-16 length as a sentinel.
    units: Vec<usize>,
}

impl<'a> CharText<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut bytes = Vec::with_capacity(source.len() + 1);
        let mut units = Vec::with_capacity(source.len() + 1);
        let mut unit = 0;
        for (idx, ch) in source.char_indices() {
            chars.push(ch);
            bytes.push(idx);
            units.push(unit);
            unit += ch.len_utf16();
        }
        bytes.push(source.len());
        units.push(unit);

        Self {
            source,
            chars,
            bytes,
            units,
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Length in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        self.units[self.len()]
    }

    /// UTF-16 offset of a character index, clamped to the end of the text.
    pub fn to_utf16(&self, index: usize) -> usize {
        self.units[index.min(self.len())]
    }

    /// Character index of a UTF-16 offset. `None` if the offset is past the
    /// end or falls between the halves of a surrogate pair.
    pub fn char_index(&self, offset: usize) -> Option<usize> {
        self.units.binary_search(&offset).ok()
    }

    /// Character index of the last boundary at or before a UTF-16 offset,
    /// clamped to the end of the text.
    pub fn char_index_floor(&self, offset: usize) -> usize {
        self.units.partition_point(|&u| u <= offset).saturating_sub(1)
    }

    /// Byte range for a UTF-16 range, or `None` if either end is out of
    /// bounds or splits a character.
    pub fn byte_range(&self, start: usize, end: usize) -> Option<Range<usize>> {
        if start > end {
            return None;
        }
        let start = self.char_index(start)?;
        let end = self.char_index(end)?;
        Some(self.bytes[start]..self.bytes[end])
    }

    /// Strict slice by UTF-16 offsets.
    pub fn get(&self, start: usize, end: usize) -> Option<&'a str> {
        let range = self.byte_range(start, end)?;
        Some(&self.source[range])
    }

    /// Slice by character indices, clamping both ends to the text. An
    /// inverted range yields an empty string.
    pub fn slice_chars(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.source[self.bytes[start]..self.bytes[end]]
    }
}
