// ============================================================
// Layer 5 — Pattern Model
// ============================================================
// The trained model under evaluation. Loading assembles three
// artefacts from the model directory:
//
//   meta.json       → ModelMeta (name, label set, phrase attr)
//   tokenizer.json  → WordSplitter
//   patterns.jsonl  → Vec<CompiledPattern>
//
// Inference is one call over the full document text:
// split into tokens, match, resolve overlaps.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::domain::span::EntitySpan;
use crate::domain::traits::EntityRecognizer;
use crate::infra::model_store::{ModelMeta, ModelStore};
use crate::infra::tokenizer_store::WordSplitter;
use crate::ml::inferencer;
use crate::ml::patterns::{CompiledPattern, PatternEntry};

#[derive(Debug)]
pub struct PatternModel {
    name:     String,
    splitter: WordSplitter,
    patterns: Vec<CompiledPattern>,
}

impl PatternModel {
    /// Load a model directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir   = dir.as_ref();
        let store = ModelStore::new(dir);
        store.ensure_exists()?;

        let meta     = store.load_meta()?;
        let splitter = store.tokenizer_store().load()?;
        let entries  = store.load_patterns()?;

        let fallback = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model");

        let model = Self::from_parts(&meta, fallback, splitter, &entries)
            .with_context(|| format!("Cannot build model from '{}'", dir.display()))?;

        tracing::info!(
            "Model '{}' (lang {}) loaded: {} patterns, labels {:?}",
            model.name,
            meta.lang.as_deref().unwrap_or("unset"),
            model.pattern_count(),
            model.labels()
        );
        Ok(model)
    }

    /// Compile raw entries against an already-loaded meta and splitter.
    pub fn from_parts(
        meta:     &ModelMeta,
        fallback: &str,
        splitter: WordSplitter,
        entries:  &[PatternEntry],
    ) -> Result<Self> {
        let allowed: HashSet<&str> = meta.labels.iter().map(String::as_str).collect();

        let mut patterns = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if !allowed.is_empty() && !allowed.contains(entry.label.as_str()) {
                bail!(
                    "Pattern {} uses label '{}' which is not in the model's labels {:?}",
                    i + 1,
                    entry.label,
                    meta.labels
                );
            }
            let compiled = CompiledPattern::compile(entry, &splitter, meta.ruler.phrase_matcher_attr)
                .with_context(|| format!("Cannot compile pattern {}", i + 1))?;
            patterns.push(compiled);
        }

        Ok(Self {
            name: meta.display_name(fallback),
            splitter,
            patterns,
        })
    }

    /// Distinct labels the model can emit, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.patterns.iter().map(|p| p.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl EntityRecognizer for PatternModel {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let tokens = self.splitter.split(text)?;
        tracing::debug!("Document split into {} tokens", tokens.len());
        Ok(inferencer::predict(&self.patterns, &tokens))
    }
}
