// ============================================================
// Layer 5b — Console Rendering
// ============================================================
// Text for every section of an evaluation run. Everything here
// returns a `String`; printing is left to the CLI.

use std::collections::BTreeMap;

use crate::data::offsets::CharIndex;
use crate::domain::span::EntitySpan;

use super::comparator::{Comparison, PredictionOutcome};

/// Render a labelled table: index column left-aligned, value columns
/// right-aligned, two spaces between columns, trailing blanks trimmed.
///
/// With `index_name`, a second header line carries the index name.
pub fn render_frame(
    index_name: Option<&str>,
    index:      &[String],
    columns:    &[String],
    cells:      &[Vec<String>],
) -> String {
    let width = |s: &str| s.chars().count();

    let index_w = index
        .iter()
        .map(|s| width(s))
        .chain(index_name.map(width))
        .max()
        .unwrap_or(0);

    let col_w: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(j, c)| {
            cells
                .iter()
                .filter_map(|row| row.get(j))
                .map(|s| width(s))
                .chain([width(c)])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |head: &str, values: &[String]| -> String {
        let mut l = format!("{head:<index_w$}");
        for (v, &w) in values.iter().zip(&col_w) {
            l += &format!("  {v:>w$}");
        }
        l.trim_end().to_string()
    };

    let mut out = String::new();
    out += &line("", columns);
    out.push('\n');
    if let Some(name) = index_name {
        out += &line(name, &vec![String::new(); columns.len()]);
        out.push('\n');
    }
    for (head, row) in index.iter().zip(cells) {
        out += &line(head, row);
        out.push('\n');
    }
    out
}

/// `1234567` → `"1,234,567"`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn span_line(code: &str, span: &EntitySpan, index: &CharIndex<'_>, detail: &str) -> String {
    format!(
        "{:<3}  [{:>6}, {:<6}]  {:?}  ({})",
        code,
        span.start,
        span.end,
        index.slice(span.start, span.end),
        detail
    )
}

/// One line per prediction in reading order, tagged with its outcome,
/// then one `FN` line per missed gold span.
pub fn render_outcomes(comparison: &Comparison, text: &str) -> String {
    let index = CharIndex::new(text);
    let mut out = String::new();

    for (p, outcome) in comparison.predicted.iter().zip(&comparison.prediction_outcomes) {
        let detail = match outcome {
            PredictionOutcome::LabelMismatch { gold } => {
                format!("{}, gold {}", p.label, comparison.gold[*gold].label)
            }
            PredictionOutcome::Boundary { gold } => {
                let g = &comparison.gold[*gold];
                format!("{}, gold [{}, {}] {}", p.label, g.start, g.end, g.label)
            }
            // Overlap mode can credit a gold span with other bounds
            PredictionOutcome::Correct { gold } if !comparison.gold[*gold].same_bounds(p) => {
                let g = &comparison.gold[*gold];
                format!("{}, gold [{}, {}]", p.label, g.start, g.end)
            }
            PredictionOutcome::Correct { .. } | PredictionOutcome::Spurious => p.label.clone(),
        };
        out += &span_line(outcome.code(), p, &index, &detail);
        out.push('\n');
    }

    for g in comparison.missed() {
        out += &span_line("FN", g, &index, &g.label);
        out.push('\n');
    }
    out
}

/// `TP=3  LBL=1  BND=0  FP=2  FN=1`
pub fn render_tally(comparison: &Comparison) -> String {
    let t = comparison.tally();
    format!(
        "TP={}  LBL={}  BND={}  FP={}  FN={}",
        t.correct, t.label_mismatch, t.boundary, t.spurious, t.missed
    )
}

/// Predicted entities only, for runs without a gold file.
pub fn render_predictions(spans: &[EntitySpan], text: &str) -> String {
    let index = CharIndex::new(text);
    let mut out = String::new();
    for s in spans {
        out += &format!(
            "[{:>6}, {:<6}]  {:?}  ({})\n",
            s.start,
            s.end,
            index.slice(s.start, s.end),
            s.label
        );
    }

    let mut per_label: BTreeMap<&str, usize> = BTreeMap::new();
    for s in spans {
        *per_label.entry(s.label.as_str()).or_default() += 1;
    }
    let labels:  Vec<String> = per_label.keys().map(|l| l.to_string()).collect();
    let columns: Vec<String> = vec!["count".to_string()];
    let cells:   Vec<Vec<String>> = per_label.values().map(|c| vec![c.to_string()]).collect();

    out.push('\n');
    out += &render_frame(Some("label"), &labels, &columns, &cells);
    out
}
