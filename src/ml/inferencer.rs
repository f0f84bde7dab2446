// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Runs compiled patterns over a token sequence and resolves the
// candidate matches into a non-overlapping entity list.
//
//   1. For every token position, ask every pattern where a match
//      starting there can end → candidate (start, end, pattern)
//   2. Resolve overlaps: longest candidate wins, ties go to the
//      earlier start, then to the earlier pattern in the file
//   3. Convert token ranges to character offsets
//   4. Return in reading order

use crate::domain::span::EntitySpan;
use crate::infra::tokenizer_store::Token;
use crate::ml::patterns::CompiledPattern;

/// A match in token coordinates, [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub start:   usize,
    pub end:     usize,
    pub pattern: usize,
}

impl Candidate {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Every non-empty match of every pattern, in (start, pattern) order.
pub fn find_candidates(patterns: &[CompiledPattern], tokens: &[Token]) -> Vec<Candidate> {
    let mut out = Vec::new();
    for start in 0..tokens.len() {
        for (pi, pattern) in patterns.iter().enumerate() {
            for end in pattern.match_ends(tokens, start) {
                if end > start {
                    out.push(Candidate { start, end, pattern: pi });
                }
            }
        }
    }
    out
}

/// Keep the longest non-overlapping candidates.
pub fn filter_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    // Stable sort keeps pattern file order for equal (len, start)
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut taken: Vec<Candidate> = Vec::new();
    for c in candidates {
        if taken.iter().all(|t| c.end <= t.start || t.end <= c.start) {
            taken.push(c);
        }
    }
    taken.sort_by_key(|c| c.start);
    taken
}

/// Run all patterns over `tokens` and return resolved entity spans.
pub fn predict(patterns: &[CompiledPattern], tokens: &[Token]) -> Vec<EntitySpan> {
    let candidates = find_candidates(patterns, tokens);
    let found = candidates.len();
    let kept  = filter_candidates(candidates);

    tracing::debug!("{} candidate matches, {} kept after overlap filtering", found, kept.len());

    kept.into_iter()
        .map(|c| {
            let pattern = &patterns[c.pattern];
            let span = EntitySpan::new(
                tokens[c.start].start,
                tokens[c.end - 1].end,
                pattern.label.clone(),
            );
            tracing::trace!(
                "{} from pattern {} ({})",
                span,
                c.pattern + 1,
                pattern.id.as_deref().unwrap_or("no id")
            );
            span
        })
        .collect()
}
