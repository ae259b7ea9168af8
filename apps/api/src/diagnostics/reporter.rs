//! Failure reports.
//!
//! Diagnostics are attached only to total failures at the model boundary: a
//! failed model call, or a response that is not JSON at all. Listing models is
//! best-effort; if it fails the report records `unavailable` and nothing else
//! changes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::llm_client::ModelCatalog;
use crate::normalize::{Rejection, UpstreamStage, ValidationError, ViolationKind};

/// What went wrong with an analysis.
#[derive(Debug, Clone)]
pub enum AnalysisFailure {
    /// A collaborator failed. Always a single root `upstream-failure` violation.
    Upstream(ValidationError),
    /// The model answered, but the answer did not validate.
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "models", rename_all = "snake_case")]
pub enum ModelAvailability {
    Listed(Vec<String>),
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub current_model: String,
    pub available_models: ModelAvailability,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub summary: String,
    pub violations: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
    /// Model output, when the model produced any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl FailureReport {
    /// The collaborator that failed, or `None` when validation rejected the response.
    pub fn upstream_stage(&self) -> Option<UpstreamStage> {
        self.violations.iter().find_map(|v| match v.kind {
            ViolationKind::UpstreamFailure { stage, .. } => Some(stage),
            _ => None,
        })
    }
}

pub struct Reporter<'a> {
    catalog: &'a dyn ModelCatalog,
    current_model: &'a str,
}

impl<'a> Reporter<'a> {
    pub fn new(catalog: &'a dyn ModelCatalog, current_model: &'a str) -> Self {
        Self {
            catalog,
            current_model,
        }
    }

    pub async fn report(&self, failure: AnalysisFailure) -> FailureReport {
        let needs_diagnostics = match &failure {
            AnalysisFailure::Upstream(v) => matches!(
                v.kind,
                ViolationKind::UpstreamFailure {
                    stage: UpstreamStage::Model,
                    ..
                }
            ),
            AnalysisFailure::Rejected(r) => r.is_unparseable(),
        };

        let diagnostics = if needs_diagnostics {
            Some(self.diagnostics().await)
        } else {
            None
        };

        let (violations, raw) = match failure {
            AnalysisFailure::Upstream(v) => (vec![v], None),
            AnalysisFailure::Rejected(r) => (r.violations, Some(r.raw)),
        };

        FailureReport {
            summary: summarize(&violations),
            violations,
            diagnostics,
            raw,
            generated_at: Utc::now(),
        }
    }

    async fn diagnostics(&self) -> Diagnostics {
        let available_models = match self.catalog.list_models().await {
            Ok(models) => ModelAvailability::Listed(models),
            Err(e) => {
                warn!("Model listing for diagnostics failed: {e}");
                ModelAvailability::Unavailable
            }
        };
        Diagnostics {
            current_model: self.current_model.to_string(),
            available_models,
        }
    }
}

/// One-line human summary. Counts are grouped by kind in a stable (alphabetical) order.
pub fn summarize(violations: &[ValidationError]) -> String {
    if let [only] = violations {
        match &only.kind {
            ViolationKind::UpstreamFailure { .. } => {
                return format!("Analysis could not be completed: {}", only.detail);
            }
            ViolationKind::Unparseable { .. } => {
                return format!("The model response could not be read: {}", only.detail);
            }
            _ => {}
        }
    }

    let errors: Vec<_> = violations.iter().filter(|v| v.is_error()).collect();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for v in &errors {
        *counts.entry(v.kind.code()).or_default() += 1;
    }
    let breakdown = counts
        .iter()
        .map(|(code, n)| format!("{n} {code}"))
        .collect::<Vec<_>>()
        .join(", ");

    let noun = if errors.len() == 1 { "violation" } else { "violations" };
    let warnings = violations.len() - errors.len();
    if warnings > 0 {
        format!(
            "The model response failed validation with {} {noun} ({breakdown}) and {warnings} warning(s)",
            errors.len()
        )
    } else {
        format!(
            "The model response failed validation with {} {noun} ({breakdown})",
            errors.len()
        )
    }
}
