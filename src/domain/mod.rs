// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of an evaluation run.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model or tokenizer code
//   - NO printing
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The document under evaluation
pub mod document;

// (start, end, label) entity spans
pub mod span;

// Document, gold and model abstractions
pub mod traits;
