// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Provides the word splitter the pattern model matches against.
//
// A model directory may ship a HuggingFace `tokenizer.json`; when
// it does, its pre-tokenizer decides where words start and end.
// Otherwise the `Whitespace` pre-tokenizer from the tokenizers
// crate is used, which splits on the regex `\w+|[^\w\s]+`:
//
//   "Стефан, жупан."  →  ["Стефан", ",", "жупан", "."]
//
// Only the pre-tokenization step is used; there is no
// vocabulary lookup, so sub-word models still yield whole words.
// Offsets are requested in CHARACTERS so they line up with gold
// span offsets without conversion.
//
// Pre-tokenizers may rewrite the pieces they return. Metaspace
// turns "у Дубровник" into ["▁у", "▁Дубровник"], and each piece's
// offsets then cover the space it replaced. Token text is therefore
// re-read from the original string and trimmed, and whitespace-only
// pieces are dropped:
//
//   piece "▁Дубровник"  offsets [1, 11)  →  "Дубровник" [2, 11)
//
// Reference: tokenizers crate documentation (PreTokenizedString)

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};

use crate::data::offsets::CharIndex;

/// One word of the document with its character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text:  String,
    pub start: usize,
    pub end:   usize,
}

/// Splits text into tokens with a tokenizers pre-tokenizer.
#[derive(Debug, Clone)]
pub struct WordSplitter {
    inner: PreTokenizerWrapper,
}

impl WordSplitter {
    /// The `\w+|[^\w\s]+` splitter used when a model has no tokenizer.json
    pub fn whitespace() -> Self {
        Self { inner: PreTokenizerWrapper::Whitespace(Whitespace::default()) }
    }

    pub fn from_pre_tokenizer(inner: PreTokenizerWrapper) -> Self {
        Self { inner }
    }

    /// Split `text` into tokens, offsets in characters.
    pub fn split(&self, text: &str) -> Result<Vec<Token>> {
        let mut pts = PreTokenizedString::from(text);
        self.inner
            .pre_tokenize(&mut pts)
            .map_err(|e| anyhow::anyhow!("Pre-tokenization failed: {e}"))?;

        let index = CharIndex::new(text);
        Ok(pts
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .filter_map(|(_, (start, end), _)| original_token(&index, start, end))
            .collect())
    }
}

/// The original text under `[start, end)`, trimmed of whitespace,
/// with offsets moved inwards to match. None if nothing is left.
fn original_token(index: &CharIndex<'_>, start: usize, end: usize) -> Option<Token> {
    let raw     = index.slice(start, end);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead  = raw.chars().take_while(|c| c.is_whitespace()).count();
    let start = start + lead;
    Some(Token {
        text: trimmed.to_string(),
        start,
        end: start + trimmed.chars().count(),
    })
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the model's splitter: `tokenizer.json`'s pre-tokenizer if
    /// the file exists and defines one, `Whitespace` otherwise.
    pub fn load(&self) -> Result<WordSplitter> {
        let path = self.dir.join("tokenizer.json");
        if !path.exists() {
            tracing::debug!("No tokenizer.json in '{}', using Whitespace", self.dir.display());
            return Ok(WordSplitter::whitespace());
        }

        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;

        match tokenizer.get_pre_tokenizer() {
            Some(pre) => {
                tracing::info!("Using pre-tokenizer from '{}'", path.display());
                Ok(WordSplitter::from_pre_tokenizer(pre.clone()))
            }
            None => {
                tracing::warn!(
                    "'{}' defines no pre-tokenizer, falling back to Whitespace",
                    path.display()
                );
                Ok(WordSplitter::whitespace())
            }
        }
    }
}
