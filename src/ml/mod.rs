// ============================================================
// Layer 5 — Model Layer
// ============================================================
// The NER model being scored. Everything model-specific lives
// here; the rest of the crate only sees the EntityRecognizer
// trait from the domain layer.
//
//   patterns.rs   : pattern file format, compilation, and
//                   per-position token matching
//
//   inferencer.rs : runs all patterns over a token sequence
//                   and resolves overlapping matches
//
//   model.rs      : PatternModel: loads a model directory and
//                   implements EntityRecognizer

/// Pattern parsing and token matching
pub mod patterns;

/// Match search and overlap resolution
pub mod inferencer;

/// The loadable model
pub mod model;
