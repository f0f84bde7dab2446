// ============================================================
// Layer 5b — Classification Report
// ============================================================
// Per-label precision / recall / F1 over the `(truth, prediction)`
// pairs from `Comparison::label_pairs`. Every distinct label in either sequence gets a row, `O` included.
// A zero denominator yields 0.0 rather than NaN.
//
// The text layout follows the widely used tabular report:
//
//                 precision    recall  f1-score   support
//
//              O      0.000     0.000     0.000         1
//         PERSON      0.500     0.500     0.500         2
//
//       accuracy                          0.333         3
//      macro avg      0.250     0.250     0.250         3
//   weighted avg      0.333     0.333     0.333         3

use std::collections::BTreeSet;

/// Scores of one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScores {
    pub label:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    /// Occurrences of the label in the truth sequence
    pub support:   usize,
}

/// Averaged scores (macro or support-weighted).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Averages {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub rows:     Vec<LabelScores>,
    pub accuracy: f64,
    pub total:    usize,
    pub macro_avg:    Averages,
    pub weighted_avg: Averages,
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Compute the report for paired (truth, prediction) labels.
pub fn classification_report(pairs: &[(String, String)]) -> ClassificationReport {
    let labels: BTreeSet<&str> = pairs
        .iter()
        .flat_map(|(t, p)| [t.as_str(), p.as_str()])
        .collect();

    let rows: Vec<LabelScores> = labels
        .into_iter()
        .map(|label| {
            let tp        = pairs.iter().filter(|(t, p)| t == label && p == label).count();
            let predicted = pairs.iter().filter(|(_, p)| p == label).count();
            let support   = pairs.iter().filter(|(t, _)| t == label).count();

            let precision = safe_div(tp as f64, predicted as f64);
            let recall    = safe_div(tp as f64, support as f64);
            let f1        = safe_div(2.0 * tp as f64, (predicted + support) as f64);

            LabelScores { label: label.to_string(), precision, recall, f1, support }
        })
        .collect();

    let total   = pairs.len();
    let correct = pairs.iter().filter(|(t, p)| t == p).count();

    let n = rows.len() as f64;
    let macro_avg = Averages {
        precision: safe_div(rows.iter().map(|r| r.precision).sum(), n),
        recall:    safe_div(rows.iter().map(|r| r.recall).sum(), n),
        f1:        safe_div(rows.iter().map(|r| r.f1).sum(), n),
    };

    let weight = |f: fn(&LabelScores) -> f64| {
        safe_div(
            rows.iter().map(|r| f(r) * r.support as f64).sum(),
            total as f64,
        )
    };
    let weighted_avg = Averages {
        precision: weight(|r| r.precision),
        recall:    weight(|r| r.recall),
        f1:        weight(|r| r.f1),
    };

    ClassificationReport {
        accuracy: safe_div(correct as f64, total as f64),
        total,
        macro_avg,
        weighted_avg,
        rows,
    }
}

impl ClassificationReport {
    /// Render as a fixed-width table with `digits` decimals.
    pub fn render(&self, digits: usize) -> String {
        let last_heading = "weighted avg";
        let width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .chain([last_heading.len(), digits])
            .max()
            .unwrap_or(last_heading.len());

        let mut out = format!(
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}\n\n",
            "", "precision", "recall", "f1-score", "support"
        );

        for r in &self.rows {
            out += &format!(
                "{:>width$}  {:>9.digits$} {:>9.digits$} {:>9.digits$} {:>9}\n",
                r.label, r.precision, r.recall, r.f1, r.support
            );
        }
        out.push('\n');

        out += &format!(
            "{:>width$}  {:>9} {:>9} {:>9.digits$} {:>9}\n",
            "accuracy", "", "", self.accuracy, self.total
        );
        for (name, avg) in [("macro avg", self.macro_avg), (last_heading, self.weighted_avg)] {
            out += &format!(
                "{:>width$}  {:>9.digits$} {:>9.digits$} {:>9.digits$} {:>9}\n",
                name, avg.precision, avg.recall, avg.f1, self.total
            );
        }
        out
    }
}

#[cfg(test)]
impl ClassificationReport {
    pub fn row(&self, label: &str) -> Option<&LabelScores> {
        self.rows.iter().find(|r| r.label == label)
    }
}
