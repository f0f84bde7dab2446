// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed model artefacts:
//
//   model_store.rs     : locates and reads meta.json and
//                        patterns.jsonl in a model directory
//
//   tokenizer_store.rs : builds the word splitter from the
//                        model's tokenizer.json, or the default
//                        Whitespace pre-tokenizer
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model directory access
pub mod model_store;

/// Pre-tokenizer loading and word splitting
pub mod tokenizer_store;
