// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Runs the model over the document without scoring, for
// inspecting what a model finds before any gold file exists.

use anyhow::Result;

use crate::data::loader::DocxLoader;
use crate::domain::document::Document;
use crate::domain::span::EntitySpan;
use crate::domain::traits::{DocumentSource, EntityRecognizer};
use crate::eval::report::group_thousands;
use crate::ml::model::PatternModel;

pub struct Prediction {
    pub model_name: String,
    pub document:   Document,
    pub spans:      Vec<EntitySpan>,
}

pub struct PredictUseCase {
    model_dir: String,
    docx_path: String,
}

impl PredictUseCase {
    pub fn new(model_dir: String, docx_path: String) -> Self {
        Self { model_dir, docx_path }
    }

    pub fn execute(&self) -> Result<Prediction> {
        tracing::info!("Loading model from '{}' …", self.model_dir);
        let model = PatternModel::load(&self.model_dir)?;
        predict_with(&model, &DocxLoader::new(&self.docx_path))
    }
}

pub fn predict_with(model: &dyn EntityRecognizer, source: &dyn DocumentSource) -> Result<Prediction> {
    tracing::info!("Reading DOCX …");
    let document = source.load()?;
    tracing::info!("  {} characters extracted", group_thousands(document.char_len()));

    let spans = model.recognize(&document.text)?;
    tracing::info!("  {} entities predicted", spans.len());

    Ok(Prediction {
        model_name: model.name(),
        document,
        spans,
    })
}
