// ============================================================
// Layer 6 — Model Store
// ============================================================
// Reads the files that make up a trained model directory:
//
//   model-best/
//     meta.json        ← optional: name, version, labels, ruler settings
//     patterns.jsonl   ← required: one entity pattern per line
//     tokenizer.json   ← optional: see tokenizer_store.rs
//
// Example meta.json:
//   {
//     "name": "srp_diplomatic_ner",
//     "version": "0.3.0",
//     "lang": "sr",
//     "labels": ["PERSON", "PLACE"],
//     "ruler": { "phrase_matcher_attr": "LOWER" }
//   }
//
// Every meta.json field has a default, so a directory with only
// patterns.jsonl is a valid model.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::patterns::{parse_patterns, MatchAttr, PatternEntry};

/// Contents of meta.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMeta {
    pub name:    Option<String>,
    pub version: Option<String>,
    pub lang:    Option<String>,

    /// Closed label set; empty means any label is allowed
    pub labels:  Vec<String>,

    pub ruler:   RulerSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerSettings {
    /// Token attribute phrase patterns are compared on
    pub phrase_matcher_attr: MatchAttr,
}

impl ModelMeta {
    /// "name-version", or whatever part of it is known
    pub fn display_name(&self, fallback: &str) -> String {
        match (&self.name, &self.version) {
            (Some(n), Some(v)) => format!("{n}-{v}"),
            (Some(n), None)    => n.clone(),
            _                  => fallback.to_string(),
        }
    }
}

/// Access to the files of one model directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fail early with a readable message when the path is wrong.
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.dir.is_dir() {
            bail!(
                "Model directory '{}' does not exist. \
                 Point --model-dir at a trained model.",
                self.dir.display()
            );
        }
        Ok(())
    }

    /// Read meta.json, or defaults when the file is absent.
    pub fn load_meta(&self) -> Result<ModelMeta> {
        let path = self.dir.join("meta.json");
        if !path.exists() {
            tracing::debug!("No meta.json in '{}', using defaults", self.dir.display());
            return Ok(ModelMeta::default());
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed model meta '{}'", path.display()))
    }

    /// Read and parse patterns.jsonl.
    pub fn load_patterns(&self) -> Result<Vec<PatternEntry>> {
        let path = self.dir.join("patterns.jsonl");
        let jsonl = fs::read_to_string(&path)
            .with_context(|| format!(
                "Cannot read patterns from '{}'. Is this a pattern model directory?",
                path.display()
            ))?;

        let entries = parse_patterns(&jsonl)
            .with_context(|| format!("Malformed patterns file '{}'", path.display()))?;

        tracing::debug!("Read {} patterns from '{}'", entries.len(), path.display());
        Ok(entries)
    }

    pub fn tokenizer_store(&self) -> TokenizerStore {
        TokenizerStore::new(&self.dir)
    }
}
