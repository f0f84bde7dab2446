// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// The single document under evaluation: where it came from and
// the plain text the model sees. Gold and predicted offsets both
// point into `text`, so it must never be cleaned or trimmed after
// extraction.
//
// Reference: Rust Book §5 (Structs and Methods)

/// A document whose text has already been extracted from its
/// on-disk format.
#[derive(Debug, Clone)]
pub struct Document {
    /// The filename, kept for log lines and report headers
    pub source: String,

    /// Full extracted text, paragraphs separated by '\n'
    pub text: String,
}

impl Document {
    /// Create a new Document with a source name and text content.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }

    /// Length in characters, the unit span offsets are measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
