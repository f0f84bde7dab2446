// ============================================================
// Layer 5b — Span Comparator
// ============================================================
// Aligns predicted spans with gold spans. Every prediction gets
// exactly one outcome:
//
//   Gold:  [Стефан]  PERSON          Gold:  [Стефан Немања]  PERSON
//   Pred:  [Стефан]  PERSON          Pred:  [Стефан]         PERSON
//          → Correct (TP)                   → Boundary
//
//   Gold:  [Рас]     PLACE           Gold:  (nothing here)
//   Pred:  [Рас]     PERSON          Pred:  [Рас]            PLACE
//          → LabelMismatch                  → Spurious (FP)
//
// and every gold span is either `Matched` by a correct prediction or
// `Missed` (FN). Matching is one-to-one: a gold span is consumed by at
// most one prediction.
//
// In `MatchMode::Strict` only exact offsets with the same label count.
// `MatchMode::Overlap` additionally credits a prediction that overlaps
// a still-unmatched gold span of the same label.

use std::collections::HashMap;

use crate::domain::span::EntitySpan;

/// Label used for "no entity" in the label sequences.
pub const OUTSIDE: &str = "O";

/// How strictly a prediction must agree with a gold span to count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Exact offsets and same label
    #[default]
    Strict,
    /// Any character overlap with the same label
    Overlap,
}

/// What happened to one predicted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// Matches gold span `gold` (true positive)
    Correct { gold: usize },
    /// Same offsets as gold span `gold`, different label
    LabelMismatch { gold: usize },
    /// Overlaps gold span `gold` without matching it
    Boundary { gold: usize },
    /// Overlaps no gold span
    Spurious,
}

impl PredictionOutcome {
    /// Short code used in the outcome listing
    pub fn code(&self) -> &'static str {
        match self {
            PredictionOutcome::Correct { .. }       => "TP",
            PredictionOutcome::LabelMismatch { .. } => "LBL",
            PredictionOutcome::Boundary { .. }      => "BND",
            PredictionOutcome::Spurious             => "FP",
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, PredictionOutcome::Correct { .. })
    }
}

/// What happened to one gold span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldOutcome {
    Matched,
    Missed,
}

/// Count of each outcome category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub correct:        usize,
    pub label_mismatch: usize,
    pub boundary:       usize,
    pub spurious:       usize,
    pub missed:         usize,
}

/// Result of aligning one prediction set against one gold set.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub mode:      MatchMode,
    pub gold:      Vec<EntitySpan>,
    pub predicted: Vec<EntitySpan>,
    /// Parallel to `predicted`
    pub prediction_outcomes: Vec<PredictionOutcome>,
    /// Parallel to `gold`
    pub gold_outcomes: Vec<GoldOutcome>,
}

impl Comparison {
    pub fn true_positives(&self) -> usize {
        self.prediction_outcomes.iter().filter(|o| o.is_correct()).count()
    }

    /// Predictions that are not credited, whatever the reason
    pub fn false_positives(&self) -> usize {
        self.predicted.len() - self.true_positives()
    }

    pub fn false_negatives(&self) -> usize {
        self.gold_outcomes
            .iter()
            .filter(|o| matches!(o, GoldOutcome::Missed))
            .count()
    }

    /// Micro precision over all labels, 0.0 with no predictions
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives(), self.predicted.len())
    }

    /// Micro recall over all labels, 0.0 with no gold spans
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives(), self.gold.len())
    }

    /// Gold spans that no prediction matched, in gold order
    pub fn missed(&self) -> impl Iterator<Item = &EntitySpan> {
        self.gold
            .iter()
            .zip(&self.gold_outcomes)
            .filter(|(_, o)| matches!(o, GoldOutcome::Missed))
            .map(|(g, _)| g)
    }

    pub fn tally(&self) -> OutcomeTally {
        let mut t = OutcomeTally { missed: self.false_negatives(), ..Default::default() };
        for o in &self.prediction_outcomes {
            match o {
                PredictionOutcome::Correct { .. }       => t.correct += 1,
                PredictionOutcome::LabelMismatch { .. } => t.label_mismatch += 1,
                PredictionOutcome::Boundary { .. }      => t.boundary += 1,
                PredictionOutcome::Spurious             => t.spurious += 1,
            }
        }
        t
    }

    /// Paired (truth, prediction) label sequences:
    ///
    /// * one pair per gold span: `(label, label)` when matched,
    ///   `(label, "O")` when missed;
    /// * one `("O", label)` pair per prediction that is not correct.
    pub fn label_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.gold.len() + self.predicted.len());

        for (g, outcome) in self.gold.iter().zip(&self.gold_outcomes) {
            let pred = match outcome {
                GoldOutcome::Matched => g.label.clone(),
                GoldOutcome::Missed         => OUTSIDE.to_string(),
            };
            pairs.push((g.label.clone(), pred));
        }

        for (p, outcome) in self.predicted.iter().zip(&self.prediction_outcomes) {
            if !outcome.is_correct() {
                pairs.push((OUTSIDE.to_string(), p.label.clone()));
            }
        }
        pairs
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Align `predicted` against `gold`.
pub fn compare(gold: &[EntitySpan], predicted: &[EntitySpan], mode: MatchMode) -> Comparison {
    let mut gold_match: Vec<bool> = vec![false; gold.len()];
    let mut outcomes:   Vec<Option<PredictionOutcome>> = vec![None; predicted.len()];

    // Exact (start, end, label) lookup, gold indices in file order
    let mut exact: HashMap<(usize, usize, &str), Vec<usize>> = HashMap::new();
    for (gi, g) in gold.iter().enumerate() {
        exact.entry((g.start, g.end, g.label.as_str())).or_default().push(gi);
    }

    // Pass 1: exact matches
    for (pi, p) in predicted.iter().enumerate() {
        let Some(candidates) = exact.get(&(p.start, p.end, p.label.as_str())) else {
            continue;
        };
        if let Some(&gi) = candidates.iter().find(|&&gi| !gold_match[gi]) {
            gold_match[gi] = true;
            outcomes[pi]   = Some(PredictionOutcome::Correct { gold: gi });
        }
    }

    // Pass 2 (lenient): same label, any overlap, gold still free
    if mode == MatchMode::Overlap {
        for (pi, p) in predicted.iter().enumerate() {
            if outcomes[pi].is_some() {
                continue;
            }
            let free = gold.iter().enumerate().find(|(gi, g)| {
                !gold_match[*gi] && g.label == p.label && g.overlaps(p)
            });
            if let Some((gi, _)) = free {
                gold_match[gi] = true;
                outcomes[pi]   = Some(PredictionOutcome::Correct { gold: gi });
            }
        }
    }

    // Pass 3: classify everything still unresolved. A repeat of a
    // gold span that is already taken counts as spurious.
    let prediction_outcomes = predicted
        .iter()
        .zip(outcomes)
        .map(|(p, resolved)| {
            resolved.unwrap_or_else(|| {
                if let Some(gi) = gold.iter().position(|g| g.same_bounds(p) && g.label != p.label) {
                    PredictionOutcome::LabelMismatch { gold: gi }
                } else if let Some(gi) = gold.iter().position(|g| g.overlaps(p) && g != p) {
                    PredictionOutcome::Boundary { gold: gi }
                } else {
                    PredictionOutcome::Spurious
                }
            })
        })
        .collect();

    let gold_outcomes = gold_match
        .into_iter()
        .map(|matched| if matched { GoldOutcome::Matched } else { GoldOutcome::Missed })
        .collect();

    Comparison {
        mode,
        gold: gold.to_vec(),
        predicted: predicted.to_vec(),
        prediction_outcomes,
        gold_outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(s: usize, e: usize, l: &str) -> EntitySpan {
        EntitySpan::new(s, e, l)
    }

    #[test]
    fn test_identical_sets_are_all_true_positives() {
        let gold = vec![span(0, 4, "PERSON"), span(10, 18, "PLACE"), span(20, 25, "PERSON")];
        let c = compare(&gold, &gold, MatchMode::Strict);

        assert_eq!(c.true_positives(), 3);
        assert_eq!(c.false_positives(), 0);
        assert_eq!(c.false_negatives(), 0);
        assert_eq!(c.precision(), 1.0);
        assert_eq!(c.recall(), 1.0);
    }

    #[test]
    fn test_spurious_prediction_does_not_reduce_recall() {
        let gold = vec![span(0, 4, "PERSON")];
        let pred = vec![span(0, 4, "PERSON"), span(30, 36, "PLACE")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        assert_eq!(c.prediction_outcomes[1], PredictionOutcome::Spurious);
        assert_eq!(c.false_positives(), 1);
        assert_eq!(c.recall(), 1.0);
        assert_eq!(c.precision(), 0.5);
    }

    #[test]
    fn test_unmatched_gold_is_missed() {
        let gold = vec![span(0, 4, "PERSON"), span(10, 15, "PLACE")];
        let pred = vec![span(0, 4, "PERSON")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        assert_eq!(c.gold_outcomes[1], GoldOutcome::Missed);
        assert_eq!(c.false_negatives(), 1);
        assert_eq!(c.missed().collect::<Vec<_>>(), vec![&gold[1]]);
    }

    #[test]
    fn test_same_offsets_different_label_is_label_mismatch() {
        let gold = vec![span(5, 8, "PLACE")];
        let pred = vec![span(5, 8, "PERSON")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        assert_eq!(c.prediction_outcomes[0], PredictionOutcome::LabelMismatch { gold: 0 });
        assert_eq!(c.true_positives(), 0);
        assert_eq!(c.false_negatives(), 1);
    }

    #[test]
    fn test_partial_overlap_is_boundary_in_strict_mode() {
        let gold = vec![span(0, 13, "PERSON")];
        let pred = vec![span(0, 6, "PERSON")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        assert_eq!(c.prediction_outcomes[0], PredictionOutcome::Boundary { gold: 0 });
        assert_eq!(c.true_positives(), 0);
        assert_eq!(c.false_negatives(), 1);
    }

    #[test]
    fn test_overlap_mode_credits_same_label_overlap() {
        let gold = vec![span(0, 13, "PERSON"), span(20, 25, "PLACE")];
        let pred = vec![span(0, 6, "PERSON"), span(21, 25, "PERSON")];
        let c = compare(&gold, &pred, MatchMode::Overlap);

        assert_eq!(c.prediction_outcomes[0], PredictionOutcome::Correct { gold: 0 });
        // Overlap with the wrong label is still not credited
        assert_eq!(c.prediction_outcomes[1], PredictionOutcome::Boundary { gold: 1 });
        assert_eq!(c.gold_outcomes[0], GoldOutcome::Matched);
        assert_eq!(c.false_negatives(), 1);
    }

    #[test]
    fn test_gold_span_matched_at_most_once() {
        let gold = vec![span(0, 4, "PERSON")];
        let pred = vec![span(0, 4, "PERSON"), span(0, 4, "PERSON")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        assert_eq!(c.true_positives(), 1);
        // A duplicate of an already matched span is spurious
        assert_eq!(c.prediction_outcomes[1], PredictionOutcome::Spurious);
    }

    #[test]
    fn test_label_pairs_layout() {
        let gold = vec![span(0, 4, "PERSON"), span(10, 15, "PLACE")];
        let pred = vec![span(0, 4, "PERSON"), span(30, 33, "PLACE")];
        let c = compare(&gold, &pred, MatchMode::Strict);

        let pairs = c.label_pairs();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(t, p)| (t.as_str(), p.as_str())).collect();
        assert_eq!(
            pairs,
            vec![("PERSON", "PERSON"), ("PLACE", "O"), ("O", "PLACE")]
        );
    }

    #[test]
    fn test_tally_counts_each_category() {
        let gold = vec![span(0, 4, "PERSON"), span(5, 9, "PLACE"), span(10, 20, "PERSON"), span(40, 44, "PLACE")];
        let pred = vec![
            span(0, 4, "PERSON"),
            span(5, 9, "PERSON"),
            span(12, 20, "PERSON"),
            span(30, 33, "PLACE"),
        ];
        let t = compare(&gold, &pred, MatchMode::Strict).tally();
        assert_eq!(
            t,
            OutcomeTally { correct: 1, label_mismatch: 1, boundary: 1, spurious: 1, missed: 3 }
        );
    }

    #[test]
    fn test_empty_inputs() {
        let c = compare(&[], &[], MatchMode::Strict);
        assert_eq!(c.precision(), 0.0);
        assert_eq!(c.recall(), 0.0);
        assert!(c.label_pairs().is_empty());
    }
}
