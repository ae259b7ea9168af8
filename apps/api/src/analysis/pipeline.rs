//! Analysis pipeline — the one core shared by every front end.
//!
//! Flow: extract text (uploads only) → build prompt → model call → normalize →
//!       success, or a failure report with diagnostics.
//!
//! Each call owns its state end to end; nothing is shared between requests
//! except the read-only schema and the collaborators in `AnalysisContext`.

use bytes::Bytes;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::prompts::ANALYSIS_PROMPT_TEMPLATE;
use crate::diagnostics::{AnalysisFailure, FailureReport, Reporter};
use crate::extraction::TextExtractor;
use crate::llm_client::{GenerativeModel, ModelCatalog};
use crate::normalize::{ContentPolicy, Normalizer, UpstreamStage, ValidationError};
use crate::schema::{analysis_schema, SchemaNode};

/// Collaborators and policy for one analysis. Borrowed from `AppState` per request.
pub struct AnalysisContext<'a> {
    pub extractor: &'a dyn TextExtractor,
    pub model: &'a dyn GenerativeModel,
    pub catalog: &'a dyn ModelCatalog,
    pub policy: ContentPolicy,
}

/// A successful analysis, ready for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedAnalysis {
    pub analysis_id: Uuid,
    pub model: String,
    pub result: Value,
    pub warnings: Vec<ValidationError>,
    pub generated_at: DateTime<Utc>,
}

/// A failed analysis: the report plus the id it was logged under.
#[derive(Debug, Clone, Serialize)]
pub struct FailedAnalysis {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub report: FailureReport,
}

pub type AnalysisOutcome = Result<CompletedAnalysis, FailedAnalysis>;

impl<'a> AnalysisContext<'a> {
    /// Upload flow: extract the resume text first, then analyze.
    pub async fn analyze_document(&self, document: Bytes, job_description: &str) -> AnalysisOutcome {
        let analysis_id = Uuid::new_v4();
        info!(
            "Analysis {analysis_id}: extracting text from {} byte upload",
            document.len()
        );

        let resume_text = match self.extractor.extract(document).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Analysis {analysis_id}: extraction failed: {e}");
                let failure = AnalysisFailure::Upstream(ValidationError::upstream(
                    UpstreamStage::Extraction,
                    e.to_string(),
                ));
                return Err(self.fail(analysis_id, failure).await);
            }
        };

        self.run(analysis_id, &resume_text, job_description).await
    }

    /// Text flow: the caller already has the resume as plain text.
    pub async fn analyze_text(&self, resume_text: &str, job_description: &str) -> AnalysisOutcome {
        self.run(Uuid::new_v4(), resume_text, job_description).await
    }

    async fn run(&self, analysis_id: Uuid, resume_text: &str, job_description: &str) -> AnalysisOutcome {
        let schema = analysis_schema();
        let prompt = build_analysis_prompt(schema, resume_text, job_description, Utc::now().date_naive());
        info!(
            "Analysis {analysis_id}: invoking {} (resume {} chars, job description {} chars)",
            self.model.model_name(),
            resume_text.len(),
            job_description.len()
        );

        let raw = match self.model.generate(&prompt, schema).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Analysis {analysis_id}: model call failed: {e}");
                let failure = AnalysisFailure::Upstream(ValidationError::upstream(
                    UpstreamStage::Model,
                    e.to_string(),
                ));
                return Err(self.fail(analysis_id, failure).await);
            }
        };

        match Normalizer::new(schema, self.policy).normalize(&raw) {
            Ok(result) => {
                info!(
                    "Analysis {analysis_id}: response valid ({} warnings)",
                    result.warnings.len()
                );
                Ok(CompletedAnalysis {
                    analysis_id,
                    model: self.model.model_name().to_string(),
                    result: result.value,
                    warnings: result.warnings,
                    generated_at: Utc::now(),
                })
            }
            Err(rejection) => {
                warn!(
                    "Analysis {analysis_id}: response rejected with {} errors",
                    rejection.errors().count()
                );
                Err(self.fail(analysis_id, AnalysisFailure::Rejected(rejection)).await)
            }
        }
    }

    async fn fail(&self, analysis_id: Uuid, failure: AnalysisFailure) -> FailedAnalysis {
        let report = Reporter::new(self.catalog, self.model.model_name())
            .report(failure)
            .await;
        FailedAnalysis { analysis_id, report }
    }
}

/// Fills the analysis prompt. Word floors come from the schema so prompt and validator agree.
pub fn build_analysis_prompt(
    schema: &SchemaNode,
    resume_text: &str,
    job_description: &str,
    today: NaiveDate,
) -> String {
    let word_floors = schema
        .word_floors()
        .iter()
        .map(|(path, min)| format!("   - {path}: {min}+"))
        .collect::<Vec<_>>()
        .join("\n");

    let quarter = format!("Q{} {}", today.month0() / 3 + 1, today.year());

    let today = today.format("%B %-d, %Y").to_string();
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("today", today.as_str()),
            ("quarter", quarter.as_str()),
            ("word_floors", word_floors.as_str()),
            ("job_description", job_description.trim()),
            ("resume_text", resume_text.trim()),
        ],
    )
}

/// Substitutes `{name}` placeholders in one left-to-right pass.
/// Inserted values are never rescanned, so user text containing `{...}` stays literal.
/// Unknown placeholders are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
