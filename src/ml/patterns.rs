// ============================================================
// Layer 5 — Entity Patterns
// ============================================================
// Parses and compiles the rules a pattern model is made of.
// One rule per line of `patterns.jsonl`, in two shapes:
//
//   Phrase pattern, matched word by word:
//     {"label": "PERSON", "pattern": "Стефан Немања"}
//
//   Token pattern, one object per token:
//     {"label": "PLACE", "pattern": [{"LOWER": "дубровник"}]}
//     {"label": "PERSON", "pattern": [{"TEXT": "краљ"}, {"TEXT": {"REGEX": "^[А-Я]"}}]}
//
// Token attributes:
//   ORTH / TEXT   exact token text
//   LOWER         lower-cased token text
// Attribute values:
//   "string"          equality
//   {"IN": [...]}     membership
//   {"REGEX": "..."}  regex search (regex crate syntax)
// Quantifiers via "OP": "?" (optional), "+" (one or more),
// "*" (zero or more). Absent means exactly one.
//
// Raw entries (PatternEntry) are what serde reads; compiled
// entries (CompiledPattern) hold ready-to-run token tests.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::infra::tokenizer_store::{Token, WordSplitter};

// ─── Raw (serde) form ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntry {
    pub label: String,
    pub pattern: PatternBody,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternBody {
    Phrase(String),
    Tokens(Vec<TokenSpec>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSpec {
    #[serde(rename = "ORTH")]
    pub orth: Option<AttrValue>,
    #[serde(rename = "TEXT")]
    pub text: Option<AttrValue>,
    #[serde(rename = "LOWER")]
    pub lower: Option<AttrValue>,
    #[serde(rename = "OP")]
    pub op: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Exact(String),
    Rule(AttrRule),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttrRule {
    #[serde(rename = "IN")]
    pub one_of: Option<Vec<String>>,
    #[serde(rename = "REGEX")]
    pub regex: Option<String>,
}

/// Which token attribute phrase patterns are compared on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchAttr {
    #[default]
    #[serde(rename = "ORTH")]
    Orth,
    #[serde(rename = "LOWER")]
    Lower,
}

impl MatchAttr {
    fn value<'t>(&self, token: &'t Token) -> std::borrow::Cow<'t, str> {
        match self {
            MatchAttr::Orth  => std::borrow::Cow::Borrowed(token.text.as_str()),
            MatchAttr::Lower => std::borrow::Cow::Owned(token.text.to_lowercase()),
        }
    }
}

/// Parse `patterns.jsonl` content. Blank lines and `//` comment
/// lines are skipped; a malformed line fails with its line number.
pub fn parse_patterns(jsonl: &str) -> Result<Vec<PatternEntry>> {
    let mut entries = Vec::new();
    for (i, line) in jsonl.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let entry: PatternEntry = serde_json::from_str(line)
            .with_context(|| format!("Invalid pattern on line {}", i + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

// ─── Compiled form ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    Optional,
    OneOrMore,
    ZeroOrMore,
}

impl Quantifier {
    fn parse(op: Option<&str>) -> Result<Self> {
        Ok(match op {
            None | Some("1") => Quantifier::One,
            Some("?") => Quantifier::Optional,
            Some("+") => Quantifier::OneOrMore,
            Some("*") => Quantifier::ZeroOrMore,
            Some(other) => bail!("Unsupported OP '{other}'"),
        })
    }
}

#[derive(Debug, Clone)]
enum ValueTest {
    Equals(String),
    OneOf(Vec<String>),
    Regex(Regex),
}

impl ValueTest {
    fn compile(value: &AttrValue) -> Result<Self> {
        match value {
            AttrValue::Exact(s) => Ok(ValueTest::Equals(s.clone())),
            AttrValue::Rule(AttrRule { one_of: Some(list), regex: None }) => {
                Ok(ValueTest::OneOf(list.clone()))
            }
            AttrValue::Rule(AttrRule { one_of: None, regex: Some(re) }) => {
                let re = Regex::new(re).with_context(|| format!("Invalid REGEX '{re}'"))?;
                Ok(ValueTest::Regex(re))
            }
            AttrValue::Rule(_) => bail!("Attribute rule needs exactly one of IN or REGEX"),
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            ValueTest::Equals(s)  => s == value,
            ValueTest::OneOf(l)   => l.iter().any(|s| s == value),
            ValueTest::Regex(re)  => re.is_match(value),
        }
    }
}

/// Tests one token must pass, plus how many times it may repeat.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    tests: Vec<(MatchAttr, ValueTest)>,
    pub quantifier: Quantifier,
}

impl TokenMatcher {
    fn exact(attr: MatchAttr, text: impl Into<String>) -> Self {
        Self {
            tests: vec![(attr, ValueTest::Equals(text.into()))],
            quantifier: Quantifier::One,
        }
    }

    fn from_spec(spec: &TokenSpec) -> Result<Self> {
        let mut tests = Vec::new();
        for (attr, value) in [
            (MatchAttr::Orth,  &spec.orth),
            (MatchAttr::Orth,  &spec.text),
            (MatchAttr::Lower, &spec.lower),
        ] {
            if let Some(v) = value {
                tests.push((attr, ValueTest::compile(v)?));
            }
        }
        Ok(Self {
            tests,
            quantifier: Quantifier::parse(spec.op.as_deref())?,
        })
    }

    /// An empty token spec `{}` accepts any token.
    pub fn matches(&self, token: &Token) -> bool {
        self.tests
            .iter()
            .all(|(attr, test)| test.accepts(&attr.value(token)))
    }
}

/// A pattern ready to run against a token sequence.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub label:  String,
    pub id:     Option<String>,
    pub tokens: Vec<TokenMatcher>,
}

impl CompiledPattern {
    /// Compile a raw entry. Phrase patterns are split with the
    /// model's own splitter so they tokenise like the document.
    pub fn compile(entry: &PatternEntry, splitter: &WordSplitter, phrase_attr: MatchAttr) -> Result<Self> {
        let tokens = match &entry.pattern {
            PatternBody::Phrase(phrase) => splitter
                .split(phrase)?
                .into_iter()
                .map(|t| match phrase_attr {
                    MatchAttr::Orth  => TokenMatcher::exact(phrase_attr, t.text),
                    MatchAttr::Lower => TokenMatcher::exact(phrase_attr, t.text.to_lowercase()),
                })
                .collect::<Vec<_>>(),
            PatternBody::Tokens(specs) => specs
                .iter()
                .map(TokenMatcher::from_spec)
                .collect::<Result<Vec<_>>>()?,
        };

        if tokens.is_empty() {
            bail!("Pattern for label '{}' has no tokens", entry.label);
        }

        Ok(Self {
            label: entry.label.clone(),
            id:    entry.id.clone(),
            tokens,
        })
    }

    /// Every token index where a match starting at `start` can end
    /// (exclusive). Zero-length matches are included; callers drop them.
    pub fn match_ends(&self, tokens: &[Token], start: usize) -> Vec<usize> {
        let mut ends = Vec::new();
        self.collect_ends(tokens, 0, start, &mut ends);
        ends.sort_unstable();
        ends.dedup();
        ends
    }

    fn collect_ends(&self, tokens: &[Token], pi: usize, ti: usize, out: &mut Vec<usize>) {
        let Some(m) = self.tokens.get(pi) else {
            out.push(ti);
            return;
        };
        let hit = |t: usize| t < tokens.len() && m.matches(&tokens[t]);

        match m.quantifier {
            Quantifier::One => {
                if hit(ti) {
                    self.collect_ends(tokens, pi + 1, ti + 1, out);
                }
            }
            Quantifier::Optional => {
                self.collect_ends(tokens, pi + 1, ti, out);
                if hit(ti) {
                    self.collect_ends(tokens, pi + 1, ti + 1, out);
                }
            }
            Quantifier::OneOrMore | Quantifier::ZeroOrMore => {
                if m.quantifier == Quantifier::ZeroOrMore {
                    self.collect_ends(tokens, pi + 1, ti, out);
                }
                let mut t = ti;
                while hit(t) {
                    t += 1;
                    self.collect_ends(tokens, pi + 1, t, out);
                }
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn compile(line: &str) -> CompiledPattern {
        let entry = parse_patterns(line).unwrap().remove(0);
        CompiledPattern::compile(&entry, &WordSplitter::whitespace(), MatchAttr::Orth).unwrap()
    }

    fn tokens(text: &str) -> Vec<Token> {
        WordSplitter::whitespace().split(text).unwrap()
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let src = "// people\n\n{\"label\": \"PERSON\", \"pattern\": \"Урош\"}\n  \n";
        let entries = parse_patterns(src).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "PERSON");
    }

    #[test]
    fn test_parse_error_names_line() {
        let src = "{\"label\": \"PERSON\", \"pattern\": \"Урош\"}\n{\"label\": 3}";
        let err = parse_patterns(src).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_unknown_token_attribute_is_rejected() {
        assert!(parse_patterns(r#"{"label": "X", "pattern": [{"POS": "PROPN"}]}"#).is_err());
    }

    #[test]
    fn test_phrase_pattern_matches_word_sequence() {
        let p = compile(r#"{"label": "PERSON", "pattern": "Стефан Немања"}"#);
        let toks = tokens("даде Стефан Немања");
        assert_eq!(p.match_ends(&toks, 1), vec![3]);
        assert!(p.match_ends(&toks, 0).is_empty());
    }

    #[test]
    fn test_lower_attribute_ignores_case() {
        let p = compile(r#"{"label": "PLACE", "pattern": [{"LOWER": "дубровник"}]}"#);
        assert_eq!(p.match_ends(&tokens("ДУБРОВНИК"), 0), vec![1]);
    }

    #[test]
    fn test_phrase_attr_lower() {
        let entry = parse_patterns(r#"{"label": "PLACE", "pattern": "Света Гора"}"#).unwrap().remove(0);
        let p = CompiledPattern::compile(&entry, &WordSplitter::whitespace(), MatchAttr::Lower).unwrap();
        assert_eq!(p.match_ends(&tokens("света гора"), 0), vec![2]);
    }

    #[test]
    fn test_regex_and_in_values() {
        let p = compile(
            r#"{"label": "PERSON", "pattern": [{"TEXT": {"IN": ["краљ", "цар"]}}, {"TEXT": {"REGEX": "^[А-Ш]"}}]}"#,
        );
        assert_eq!(p.match_ends(&tokens("цар Душан"), 0), vec![2]);
        assert!(p.match_ends(&tokens("цар душан"), 0).is_empty());
    }

    #[test]
    fn test_quantifiers() {
        let p = compile(r#"{"label": "PERSON", "pattern": [{"TEXT": "жупан"}, {"TEXT": "велики", "OP": "?"}]}"#);
        assert_eq!(p.match_ends(&tokens("жупан велики"), 0), vec![1, 2]);

        let plus = compile(r#"{"label": "X", "pattern": [{"TEXT": "и", "OP": "+"}]}"#);
        assert_eq!(plus.match_ends(&tokens("и и и"), 0), vec![1, 2, 3]);

        let star = compile(r#"{"label": "X", "pattern": [{"TEXT": "а"}, {"TEXT": "и", "OP": "*"}]}"#);
        assert_eq!(star.match_ends(&tokens("а и и"), 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsupported_op_is_rejected() {
        let entry = parse_patterns(r#"{"label": "X", "pattern": [{"TEXT": "а", "OP": "!"}]}"#).unwrap().remove(0);
        assert!(CompiledPattern::compile(&entry, &WordSplitter::whitespace(), MatchAttr::Orth).is_err());
    }

    #[test]
    fn test_empty_phrase_is_rejected() {
        let entry = parse_patterns(r#"{"label": "X", "pattern": "   "}"#).unwrap().remove(0);
        assert!(CompiledPattern::compile(&entry, &WordSplitter::whitespace(), MatchAttr::Orth).is_err());
    }
}
