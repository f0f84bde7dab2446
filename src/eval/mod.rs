// ============================================================
// Layer 5b — Scoring
// ============================================================
// Turns two span lists into numbers and tables:
//
//   gold + predicted
//       │
//       ▼
//   comparator      → per-span outcomes, (truth, pred) label pairs
//       │
//       ├──► classification → precision / recall / F1 per label
//       └──► confusion      → T_x × P_y counts, TP/FP/FN per label
//
//   report          → console text for all of the above
//
// Pure computation: no I/O, no model code.

/// Gold vs. predicted span alignment
pub mod comparator;

/// Per-label precision / recall / F1
pub mod classification;

/// Confusion matrix and per-label counts
pub mod confusion;

/// Text rendering
pub mod report;
