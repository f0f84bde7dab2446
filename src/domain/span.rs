// ============================================================
// Layer 3 — EntitySpan Domain Type
// ============================================================
// One entity occurrence in a document: a half-open range of
// CHARACTER offsets plus the entity label.
//
//   Text:   "Стефан Немања даде Хиландару"
//   Span:   [0, 13) PERSON  → "Стефан Немања"
//
// Offsets count Unicode scalar values, not UTF-8 bytes, so the
// same numbers produced by the annotation tool can be used
// directly. Converting to byte ranges for slicing is done by
// data::offsets::CharIndex.
//
// Gold spans and predicted spans share this type; an entity has
// no identity beyond its offsets and label.
//
// Reference: Rust Book §5 (Structs), §10 (Derive Macros)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (start, end, label) triple over a document's characters.
///
/// Serialises as a JSON array `[start, end, "LABEL"]`, which is the
/// layout used by the gold standard files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize, String)", into = "(usize, usize, String)")]
pub struct EntitySpan {
    /// First character of the entity (inclusive)
    pub start: usize,

    /// One past the last character of the entity (exclusive)
    pub end: usize,

    /// Entity type, e.g. "PERSON"
    pub label: String,
}

impl EntitySpan {
    /// Create a new span. Callers can pass &str or String for the label.
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self { start, end, label: label.into() }
    }

    /// Offsets only, without the label
    pub fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// True when both spans cover exactly the same characters
    pub fn same_bounds(&self, other: &EntitySpan) -> bool {
        self.bounds() == other.bounds()
    }

    /// True when the two half-open ranges share at least one character
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<(usize, usize, String)> for EntitySpan {
    fn from((start, end, label): (usize, usize, String)) -> Self {
        Self { start, end, label }
    }
}

impl From<EntitySpan> for (usize, usize, String) {
    fn from(span: EntitySpan) -> Self {
        (span.start, span.end, span.label)
    }
}

impl fmt::Display for EntitySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] {}", self.start, self.end, self.label)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_half_open() {
        let a = EntitySpan::new(0, 4, "PERSON");
        let b = EntitySpan::new(4, 8, "PERSON");
        let c = EntitySpan::new(3, 5, "PLACE");
        // Touching ranges do not overlap
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_same_bounds_ignores_label() {
        let a = EntitySpan::new(10, 20, "PERSON");
        let b = EntitySpan::new(10, 20, "PLACE");
        assert!(a.same_bounds(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_deserialises_from_triple() {
        let span: EntitySpan = serde_json::from_str(r#"[42, 48, "PERSON"]"#).unwrap();
        assert_eq!(span, EntitySpan::new(42, 48, "PERSON"));
        assert_eq!(serde_json::to_string(&span).unwrap(), r#"[42,48,"PERSON"]"#);
    }
}
