// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// One evaluation run, in order:
//
//   Step 1: Load the model          (Layer 5 - ml)
//   Step 2: Read the document text  (Layer 4 - data)
//   Step 3: Load the gold spans     (Layer 4 - data)
//   Step 4: Run inference once      (Layer 5 - ml)
//   Step 5: Compare and score       (Layer 5b - eval)
//
// The result is returned as an Evaluation value; rendering and
// printing happen in Layer 1.

use anyhow::Result;

use crate::data::{gold::{check_bounds, GoldLoader}, loader::DocxLoader};
use crate::domain::document::Document;
use crate::domain::traits::{DocumentSource, EntityRecognizer, GoldSource};
use crate::eval::classification::{classification_report, ClassificationReport};
use crate::eval::comparator::{compare, Comparison, MatchMode};
use crate::eval::confusion::ConfusionMatrix;
use crate::eval::report::group_thousands;
use crate::ml::model::PatternModel;

// ─── Evaluation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub model_dir:  String,
    pub docx_path:  String,
    pub gold_path:  String,
    pub match_mode: MatchMode,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            model_dir:  "trained_models/output/model-best".to_string(),
            docx_path:  "docs/testing/church_document_annotated.docx".to_string(),
            gold_path:  "docs/testing/church_document_annotated.json".to_string(),
            match_mode: MatchMode::Strict,
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model_name:     String,
    pub document:       Document,
    pub comparison:     Comparison,
    pub classification: ClassificationReport,
    pub confusion:      ConfusionMatrix,
}

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    /// Run against the files named in the config.
    pub fn execute(&self) -> Result<Evaluation> {
        tracing::info!("Loading model from '{}' …", self.config.model_dir);
        let model = PatternModel::load(&self.config.model_dir)?;

        self.execute_with(
            &model,
            &DocxLoader::new(&self.config.docx_path),
            &GoldLoader::new(&self.config.gold_path),
        )
    }

    /// Run with explicit sources; `execute` wires in the file-backed ones.
    pub fn execute_with(
        &self,
        model:  &dyn EntityRecognizer,
        source: &dyn DocumentSource,
        gold:   &dyn GoldSource,
    ) -> Result<Evaluation> {
        tracing::info!("Reading DOCX …");
        let document = source.load()?;
        let char_len = document.char_len();
        tracing::info!("  {} characters extracted", group_thousands(char_len));

        tracing::info!("Loading gold spans …");
        let gold_spans = gold.load_spans()?;
        tracing::info!("  {} gold entities", gold_spans.len());
        check_bounds(&gold_spans, char_len);

        tracing::info!("Running evaluation …");
        let predicted = model.recognize(&document.text)?;
        tracing::info!("  {} entities predicted by '{}'", predicted.len(), model.name());

        let comparison = compare(&gold_spans, &predicted, self.config.match_mode);
        let pairs      = comparison.label_pairs();

        Ok(Evaluation {
            model_name:     model.name(),
            classification: classification_report(&pairs),
            confusion:      ConfusionMatrix::from_pairs(&pairs),
            comparison,
            document,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::span::EntitySpan;

    struct FixedDocument(&'static str);

    impl DocumentSource for FixedDocument {
        fn load(&self) -> Result<Document> {
            Ok(Document::new("fixed.docx", self.0))
        }
    }

    struct FixedGold(Vec<EntitySpan>);

    impl GoldSource for FixedGold {
        fn load_spans(&self) -> Result<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    struct FixedModel(Vec<EntitySpan>);

    impl EntityRecognizer for FixedModel {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    fn run(gold: Vec<EntitySpan>, predicted: Vec<EntitySpan>) -> Evaluation {
        EvaluateUseCase::new(EvaluateConfig::default())
            .execute_with(&FixedModel(predicted), &FixedDocument("Урош краљ"), &FixedGold(gold))
            .unwrap()
    }

    #[test]
    fn test_single_true_positive_end_to_end() {
        let eval = run(
            vec![EntitySpan::new(0, 4, "PERSON")],
            vec![EntitySpan::new(0, 4, "PERSON")],
        );
        let person = eval.classification.row("PERSON").unwrap();
        assert_eq!(eval.comparison.true_positives(), 1);
        assert_eq!(person.precision, 1.0);
        assert_eq!(person.recall, 1.0);
        assert_eq!(eval.confusion.get("PERSON", "PERSON"), 1);
        assert_eq!(eval.model_name, "fixed");
    }

    #[test]
    fn test_single_false_negative_end_to_end() {
        let eval = run(vec![EntitySpan::new(0, 4, "PERSON")], vec![]);
        let person = eval.classification.row("PERSON").unwrap();
        assert_eq!(eval.comparison.false_negatives(), 1);
        assert_eq!(person.recall, 0.0);
        assert_eq!(eval.confusion.get("PERSON", "O"), 1);
    }

    #[test]
    fn test_label_mismatch_counts_against_both_labels() {
        let eval = run(
            vec![EntitySpan::new(0, 4, "PERSON")],
            vec![EntitySpan::new(0, 4, "PLACE")],
        );
        let counts = eval.confusion.per_label();
        let person = counts.iter().find(|c| c.label == "PERSON").unwrap();
        let place  = counts.iter().find(|c| c.label == "PLACE").unwrap();
        assert_eq!((person.tp, person.fp, person.fn_), (0, 0, 1));
        assert_eq!((place.tp, place.fp, place.fn_), (0, 1, 0));
    }

    #[test]
    fn test_overlap_mode_is_passed_through() {
        let config = EvaluateConfig { match_mode: MatchMode::Overlap, ..Default::default() };
        let eval = EvaluateUseCase::new(config)
            .execute_with(
                &FixedModel(vec![EntitySpan::new(0, 3, "PERSON")]),
                &FixedDocument("Урош краљ"),
                &FixedGold(vec![EntitySpan::new(0, 4, "PERSON")]),
            )
            .unwrap();
        assert_eq!(eval.comparison.true_positives(), 1);
    }

    #[test]
    fn test_missing_model_dir_fails() {
        let config = EvaluateConfig {
            model_dir: "/nonexistent/model-best".to_string(),
            ..Default::default()
        };
        assert!(EvaluateUseCase::new(config).execute().is_err());
    }
}
