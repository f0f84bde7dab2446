// ============================================================
// Layer 4 — Character Offset Index
// ============================================================
// Span offsets count characters; Rust strings are indexed by
// UTF-8 byte. Every Cyrillic letter is two bytes, so slicing
// `&text[start..end]` with character offsets would panic or cut
// a letter in half.
//
// CharIndex precomputes the byte position of every character
// once, so each conversion afterwards is a table lookup:
//
//   text:          "Бар и"
//   char offsets:   0 1 2 3 4 (5)
//   byte offsets:   0 2 4 6 7 (9)
//
// Offsets past the end clamp to the end of the text and an
// inverted range yields an empty slice instead of a panic.
//
// Reference: Rust Book §8.2 (Storing UTF-8 Encoded Text with Strings)

/// Char → byte lookup table for one text.
pub struct CharIndex<'a> {
    text: &'a str,
    /// byte_at[i] = byte offset of char i; one extra entry = text.len()
    byte_at: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut byte_at: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_at.push(text.len());
        Self { text, byte_at }
    }

    /// Byte offset of a character offset, clamped to the text end
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        self.byte_at
            .get(char_idx)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Slice the text by character offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let b_start = self.char_to_byte(start);
        let b_end   = self.char_to_byte(end);
        if b_start >= b_end {
            return "";
        }
        &self.text[b_start..b_end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_identity() {
        let idx = CharIndex::new("hello");
        assert_eq!(idx.char_to_byte(3), 3);
        assert_eq!(idx.slice(1, 4), "ell");
    }

    #[test]
    fn test_cyrillic_slice_by_chars() {
        let text = "Жупан Десимир у Дубровнику";
        let idx  = CharIndex::new(text);
        assert_eq!(idx.slice(6, 13), "Десимир");
        assert_eq!(idx.slice(16, 26), "Дубровнику");
    }

    #[test]
    fn test_char_to_byte_table() {
        let idx = CharIndex::new("Бар и");
        assert_eq!(idx.char_to_byte(2), 4);
        assert_eq!(idx.char_to_byte(3), 6);
        assert_eq!(idx.char_to_byte(4), 7);
        assert_eq!(idx.char_to_byte(5), 9);
        assert_eq!(idx.char_to_byte(50), 9);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let idx = CharIndex::new("абв");
        assert_eq!(idx.slice(1, 100), "бв");
        assert_eq!(idx.slice(50, 100), "");
        assert_eq!(idx.slice(2, 1), "");
    }
}
