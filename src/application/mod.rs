// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one run.
//
// Rules for this layer:
//   - No scoring math here (that's eval)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Score a model against gold spans
pub mod evaluate_use_case;

// Run a model without scoring
pub mod predict_use_case;
