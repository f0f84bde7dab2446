// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments, hands off to a use case, prints the result.
// All computation is delegated to Layer 2 and below; this layer
// only routes and prints.
//
// Two commands are supported:
//   1. `evaluate`: score the model against gold spans
//   2. `predict`:  list what the model finds
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs};

use crate::eval::confusion::render_label_counts;
use crate::eval::report::{render_outcomes, render_predictions, render_tally};

#[derive(Parser, Debug)]
#[command(
    name = "ner-eval",
    version,
    about = "Score a trained NER model against a gold-annotated .docx document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Evaluate(args) => run_evaluate(&args),
            Commands::Predict(args)  => run_predict(&args),
        }
    }
}

fn run_evaluate(args: &EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let eval = EvaluateUseCase::new(args.into()).execute()?;

    println!("\n=== Entity-level outcomes (reading order) ===");
    print!("{}", render_outcomes(&eval.comparison, &eval.document.text));
    println!("\n{}", render_tally(&eval.comparison));

    println!("\n=== classification report ===");
    println!("{}", eval.classification.render(args.digits));

    println!("\n=== confusion matrix ===");
    print!("{}", eval.confusion.render());

    println!("\n=== TP / FP / FN per label ===");
    print!("{}", render_label_counts(&eval.confusion.per_label()));

    tracing::info!(
        "'{}' on '{}' ({:?} matching): TP {}, FP {}, FN {}, precision {:.3}, recall {:.3}",
        eval.model_name,
        eval.document.source,
        eval.comparison.mode,
        eval.comparison.true_positives(),
        eval.comparison.false_positives(),
        eval.comparison.false_negatives(),
        eval.comparison.precision(),
        eval.comparison.recall()
    );
    Ok(())
}

fn run_predict(args: &PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let prediction = PredictUseCase::new(args.model_dir.clone(), args.docx.clone()).execute()?;

    println!(
        "\n=== Entities predicted by '{}' in '{}' ===",
        prediction.model_name, prediction.document.source
    );
    print!("{}", render_predictions(&prediction.spans, &prediction.document.text));
    Ok(())
}
