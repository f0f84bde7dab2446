// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The three seams of an evaluation run:
//
//   DocumentSource   → where the document text comes from
//   GoldSource       → where the reference annotations come from
//   EntityRecognizer → the model being scored
//
// The application layer only talks to these traits, so the
// evaluation logic can be exercised with in-memory fakes and a
// different model format only needs a new EntityRecognizer impl.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::document::Document;
use crate::domain::span::EntitySpan;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can produce the document to evaluate on.
///
/// Implementations:
///   - DocxLoader → extracts paragraph text from a .docx file
pub trait DocumentSource {
    fn load(&self) -> Result<Document>;
}

// ─── GoldSource ───────────────────────────────────────────────────────────────
/// Any component that can produce the human-annotated spans.
///
/// Implementations:
///   - GoldLoader → reads `{"entities": [[start, end, label], ...]}`
pub trait GoldSource {
    fn load_spans(&self) -> Result<Vec<EntitySpan>>;
}

// ─── EntityRecognizer ─────────────────────────────────────────────────────────
/// A trained NER model.
///
/// Implementations:
///   - PatternModel → rule-based model loaded from a model directory
pub trait EntityRecognizer {
    /// Human-readable model identifier for log lines
    fn name(&self) -> String;

    /// Run inference over the whole text once and return the
    /// predicted spans in reading order, offsets in characters.
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>>;
}
