// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `evaluate` and `predict`, and
// their flags. Defaults point at the usual project layout so a
// bare `ner-eval evaluate` scores the bundled test document.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::eval::comparator::MatchMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a trained model against a gold-annotated document
    Evaluate(EvaluateArgs),

    /// Print the entities a model finds in a document
    Predict(PredictArgs),
}

/// How a prediction must agree with a gold span to count as correct
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum MatchModeArg {
    /// Same start, end and label
    #[default]
    Strict,
    /// Same label and any character overlap
    Overlap,
}

impl From<MatchModeArg> for MatchMode {
    fn from(m: MatchModeArg) -> Self {
        match m {
            MatchModeArg::Strict  => MatchMode::Strict,
            MatchModeArg::Overlap => MatchMode::Overlap,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Trained model directory (patterns.jsonl, optional meta.json / tokenizer.json)
    #[arg(long, default_value = "trained_models/output/model-best")]
    pub model_dir: String,

    /// Word document whose text is annotated
    #[arg(long, default_value = "docs/testing/church_document_annotated.docx")]
    pub docx: String,

    /// Gold spans: {"entities": [[start, end, label], ...]}
    #[arg(long, default_value = "docs/testing/church_document_annotated.json")]
    pub gold: String,

    #[arg(long, value_enum, default_value_t = MatchModeArg::Strict)]
    pub match_mode: MatchModeArg,

    /// Decimal places in the classification report
    #[arg(long, default_value_t = 3)]
    pub digits: usize,
}

/// The application layer never sees clap types.
impl From<&EvaluateArgs> for EvaluateConfig {
    fn from(a: &EvaluateArgs) -> Self {
        EvaluateConfig {
            model_dir:  a.model_dir.clone(),
            docx_path:  a.docx.clone(),
            gold_path:  a.gold.clone(),
            match_mode: a.match_mode.into(),
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, default_value = "trained_models/output/model-best")]
    pub model_dir: String,

    #[arg(long, default_value = "docs/testing/church_document_annotated.docx")]
    pub docx: String,
}
