//! Axum route handlers for the JD API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jd::classifier::classify_job_description;
use crate::jd::extractor::extract_job_description;
use crate::jd::input::{resolve_job_description, JdResolution};
use crate::jd::scorer::{score_candidate, CandidateScore};
use crate::resume::{intake_resume, ResumeSource};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub jd_info: String,
}

#[derive(Debug, Serialize)]
pub struct JdResponse {
    pub jd_info: String,
}

fn require_non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jd/classify
///
/// Returns the text unchanged when the model reads it as a job description.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<JdResponse>, AppError> {
    require_non_empty(&request.text, "text")?;

    let jd_info = classify_job_description(&request.text, state.llm.as_ref()).await?;

    Ok(Json(JdResponse { jd_info }))
}

/// POST /api/v1/jd/extract
///
/// Drives a browser session to the posting and returns the extracted JD text.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<JdResponse>, AppError> {
    require_non_empty(&request.url, "url")?;

    let agent_config = state.config.agent_config();
    let jd_info =
        extract_job_description(request.url.trim(), state.browser.as_ref(), &agent_config)
            .await?;

    Ok(Json(JdResponse { jd_info }))
}

/// POST /api/v1/jd/resolve
///
/// Accepts either a link or pasted text and routes it to the extractor or classifier.
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<JdResolution>, AppError> {
    require_non_empty(&request.jd_info, "jd_info")?;

    let agent_config = state.config.agent_config();
    let resolution = resolve_job_description(
        &request.jd_info,
        state.llm.as_ref(),
        state.browser.as_ref(),
        &agent_config,
    )
    .await?;

    Ok(Json(resolution))
}

/// POST /api/v1/jd/score
///
/// # Multipart Fields
/// - `jd_info`: job description text (required)
/// - `resume_file`: PDF/DOC/DOCX upload
/// - `resume_url`: share link to the résumé, used when no file is uploaded
pub async fn handle_score(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CandidateScore>, AppError> {
    let mut jd_info: Option<String> = None;
    let mut resume_file: Option<(Option<String>, Bytes)> = None;
    let mut resume_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("jd_info") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid jd_info field: {e}")))?;
                jd_info = Some(text);
            }
            Some("resume_file") => {
                let filename = field.file_name().map(|n| n.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                resume_file = Some((filename, data));
            }
            Some("resume_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume_url field: {e}")))?;
                resume_url = Some(text).filter(|u| !u.trim().is_empty());
            }
            _ => {}
        }
    }

    let jd_info = jd_info.unwrap_or_default();
    require_non_empty(&jd_info, "jd_info")?;

    let source = match (resume_file, resume_url) {
        (Some((filename, data)), _) => ResumeSource::Upload {
            filename,
            bytes: data.to_vec(),
        },
        (None, Some(url)) => ResumeSource::Url(url.trim().to_string()),
        (None, None) => {
            return Err(AppError::Validation(
                "Either file or resume_url must be provided".to_string(),
            ))
        }
    };

    let resume = intake_resume(
        source,
        &state.http,
        state.config.doc_to_pdf_api_url.as_deref(),
    )
    .await?;
    info!("Scoring resume {} ({})", resume.filename, resume.file_id);

    let score = score_candidate(&jd_info, resume.path(), state.llm.as_ref()).await?;

    Ok(Json(score))
}
