//! Axum route handlers for the Analysis API.
//!
//! Two thin front ends over the same pipeline: a multipart upload form and a
//! JSON endpoint taking already-extracted text.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::analysis::pipeline::{AnalysisContext, AnalysisOutcome, FailedAnalysis};
use crate::errors::AppError;
use crate::extraction::is_pdf;
use crate::normalize::UpstreamStage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl IntoResponse for FailedAnalysis {
    fn into_response(self) -> Response {
        // An unreadable document is the caller's problem; only the model is a gateway.
        let status = match self.report.upstream_stage() {
            Some(UpstreamStage::Model) => StatusCode::BAD_GATEWAY,
            Some(UpstreamStage::Extraction) | None => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(self)).into_response()
    }
}

fn context(state: &AppState) -> AnalysisContext<'_> {
    AnalysisContext {
        extractor: state.extractor.as_ref(),
        model: state.model.as_ref(),
        catalog: state.catalog.as_ref(),
        policy: state.config.content_policy,
    }
}

fn respond(outcome: AnalysisOutcome) -> Response {
    match outcome {
        Ok(done) => (StatusCode::OK, Json(done)).into_response(),
        Err(failed) => failed.into_response(),
    }
}

/// POST /api/v1/analyses
///
/// Multipart form with a `resume` PDF file and a `job_description` text field.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if !file_name.to_ascii_lowercase().ends_with(".pdf") {
                    return Err(AppError::Validation(format!(
                        "resume must be a .pdf file, got '{file_name}'"
                    )));
                }
                let bytes = field.bytes().await?;
                if !bytes.is_empty() && !is_pdf(&bytes) {
                    return Err(AppError::Validation(format!(
                        "resume '{file_name}' is not a PDF document"
                    )));
                }
                resume = Some(bytes);
            }
            "job_description" => job_description = Some(field.text().await?),
            _ => {}
        }
    }

    let resume = resume
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = non_empty(job_description, "job_description")?;

    let ctx = context(&state);
    Ok(respond(ctx.analyze_document(resume, &job_description).await))
}

/// POST /api/v1/analyses/text
///
/// JSON body `{resume_text, job_description}` for callers that extract text themselves.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<TextAnalysisRequest>,
) -> Result<Response, AppError> {
    let resume_text = non_empty(Some(request.resume_text), "resume_text")?;
    let job_description = non_empty(Some(request.job_description), "job_description")?;

    let ctx = context(&state);
    Ok(respond(ctx.analyze_text(&resume_text, &job_description).await))
}

fn non_empty(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} cannot be empty")))
}
