// ============================================================
// Layer 4 — Gold Standard Loader
// ============================================================
// Reads the human annotations that sit next to the document:
//
//   {
//     "entities": [
//       [42, 48, "PERSON"],
//       [49, 62, "PERSON"]
//     ]
//   }
//
// `entities` is the only field read; anything else in the file
// (annotator name, tool version, ...) is ignored by serde.
// Offsets are not validated here, see `check_bounds`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::domain::span::EntitySpan;
use crate::domain::traits::GoldSource;

#[derive(Debug, Deserialize)]
struct GoldFile {
    entities: Vec<EntitySpan>,
}

/// Loads gold spans from a JSON sidecar file.
pub struct GoldLoader {
    path: PathBuf,
}

impl GoldLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GoldSource for GoldLoader {
    fn load_spans(&self) -> Result<Vec<EntitySpan>> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read gold spans from '{}'", self.path.display()))?;

        let spans = parse_gold(&json)
            .with_context(|| format!("Malformed gold file '{}'", self.path.display()))?;

        tracing::debug!("Parsed {} gold spans from '{}'", spans.len(), self.path.display());
        Ok(spans)
    }
}

/// Parse the `{"entities": [...]}` layout.
pub fn parse_gold(json: &str) -> Result<Vec<EntitySpan>> {
    let file: GoldFile = serde_json::from_str(json)?;
    Ok(file.entities)
}

/// Warn about spans that cannot point into a text of `char_len`
/// characters. Such spans are still scored.
///
/// Returns the number of suspicious spans.
pub fn check_bounds(spans: &[EntitySpan], char_len: usize) -> usize {
    let mut bad = 0;
    for span in spans {
        if span.start > span.end || span.end > char_len {
            tracing::warn!(
                "Gold span {} does not fit a text of {} characters",
                span,
                char_len
            );
            bad += 1;
        }
    }
    bad
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triples_in_file_order() {
        let spans = parse_gold(
            r#"{"entities": [[42, 48, "PERSON"], [49, 62, "PERSON"], [0, 3, "PLACE"]]}"#,
        )
        .unwrap();
        assert_eq!(
            spans,
            vec![
                EntitySpan::new(42, 48, "PERSON"),
                EntitySpan::new(49, 62, "PERSON"),
                EntitySpan::new(0, 3, "PLACE"),
            ]
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let spans = parse_gold(r#"{"annotator": "mb", "entities": [], "text": "..."}"#).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_missing_entities_field_is_an_error() {
        assert!(parse_gold(r#"{"spans": []}"#).is_err());
    }

    #[test]
    fn test_bad_triple_is_an_error() {
        assert!(parse_gold(r#"{"entities": [[1, "PERSON"]]}"#).is_err());
        assert!(parse_gold(r#"{"entities": [[-1, 2, "PERSON"]]}"#).is_err());
    }

    #[test]
    fn test_loader_reads_file_and_reports_path() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("gold.json");
        fs::write(&path, r#"{"entities": [[0, 4, "PERSON"]]}"#).unwrap();
        let spans = GoldLoader::new(&path).load_spans().unwrap();
        assert_eq!(spans, vec![EntitySpan::new(0, 4, "PERSON")]);

        fs::write(&path, "{ not json").unwrap();
        let err = GoldLoader::new(&path).load_spans().unwrap_err();
        assert!(err.to_string().contains("gold.json"));
    }

    #[test]
    fn test_check_bounds_counts_bad_spans() {
        let spans = vec![
            EntitySpan::new(0, 4, "PERSON"),
            EntitySpan::new(5, 3, "PERSON"),
            EntitySpan::new(8, 12, "PLACE"),
        ];
        assert_eq!(check_bounds(&spans, 10), 2);
        assert_eq!(check_bounds(&spans[..1], 10), 0);
    }
}
