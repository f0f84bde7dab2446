// ============================================================
// Layer 5b — Confusion Matrix
// ============================================================
// Confusion matrix over paired label sequences. Label order is
// every entity label sorted, then `O` last:
//
//             P_PERSON  P_PLACE  P_O
//   T_PERSON         3        0    1
//   T_PLACE          1        2    0
//   T_O              2        0    0
//
// Per-label counts come straight off the matrix:
// TP = diagonal cell, FP = column total − TP, FN = row total − TP.

use std::collections::BTreeSet;

use super::comparator::OUTSIDE;
use super::report::render_frame;

/// TP / FP / FN for one entity label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCounts {
    pub label: String,
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
}

#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    /// counts[truth][prediction]
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let entity_labels: BTreeSet<&str> = pairs
            .iter()
            .flat_map(|(t, p)| [t.as_str(), p.as_str()])
            .filter(|l| *l != OUTSIDE)
            .collect();

        let mut labels: Vec<String> = entity_labels.into_iter().map(String::from).collect();
        labels.push(OUTSIDE.to_string());

        let n = labels.len();
        let mut counts = vec![vec![0usize; n]; n];
        for (t, p) in pairs {
            // Every label in `pairs` is in `labels` by construction
            if let (Some(ti), Some(pi)) = (position(&labels, t), position(&labels, p)) {
                counts[ti][pi] += 1;
            }
        }
        Self { labels, counts }
    }

    /// Cell for (truth, prediction); 0 for unknown labels
    pub fn get(&self, truth: &str, pred: &str) -> usize {
        match (position(&self.labels, truth), position(&self.labels, pred)) {
            (Some(t), Some(p)) => self.counts[t][p],
            _ => 0,
        }
    }

    /// Counts for every entity label, `O` excluded.
    pub fn per_label(&self) -> Vec<LabelCounts> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.as_str() != OUTSIDE)
            .map(|(i, label)| {
                let tp      = self.counts[i][i];
                let col_sum: usize = self.counts.iter().map(|row| row[i]).sum();
                let row_sum: usize = self.counts[i].iter().sum();
                LabelCounts {
                    label: label.clone(),
                    tp,
                    fp:  col_sum - tp,
                    fn_: row_sum - tp,
                }
            })
            .collect()
    }

    /// Matrix as a text table, rows `T_<label>`, columns `P_<label>`.
    pub fn render(&self) -> String {
        let index:   Vec<String> = self.labels.iter().map(|l| format!("T_{l}")).collect();
        let columns: Vec<String> = self.labels.iter().map(|l| format!("P_{l}")).collect();
        let cells: Vec<Vec<String>> = self
            .counts
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        render_frame(None, &index, &columns, &cells)
    }
}

/// Per-label TP / FP / FN as a text table indexed by label.
pub fn render_label_counts(counts: &[LabelCounts]) -> String {
    let index: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();
    let columns = vec!["TP".to_string(), "FP".to_string(), "FN".to_string()];
    let cells: Vec<Vec<String>> = counts
        .iter()
        .map(|c| vec![c.tp.to_string(), c.fp.to_string(), c.fn_.to_string()])
        .collect();
    render_frame(Some("label"), &index, &columns, &cells)
}

fn position(labels: &[String], label: &str) -> Option<usize> {
    labels.iter().position(|l| l == label)
}

#[cfg(test)]
impl ConfusionMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
