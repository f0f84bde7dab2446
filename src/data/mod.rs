// ============================================================
// Layer 4 — Data Access
// ============================================================
// Everything that turns files on disk into domain values:
//
//   .docx file  ──► DocxLoader  ──► Document (text)
//   .json file  ──► GoldLoader  ──► Vec<EntitySpan>
//
// plus CharIndex, which lets any layer slice the document by
// the character offsets that spans use.
//
// Reference: Rust Book §7 (Modules), §9 (Error Handling)

/// Extracts paragraph text from a .docx file using docx-rs
pub mod loader;

/// Reads `{"entities": [[start, end, label], ...]}` gold files
pub mod gold;

/// Character ↔ byte offset conversion
pub mod offsets;
