//! Candidate Scorer: rates an uploaded résumé against a job description.
//!
//! The model's answer is returned as-is: `score` is not clamped and the skill lists
//! are not checked. Callers must treat the result as best-effort.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jd::prompts::SCORE_PROMPT_TEMPLATE;
use crate::llm_client::{parse_json, GenerationRequest, GenerativeModel, Part, Schema};

/// Let the model pick its own thinking budget.
const THINKING_BUDGET: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub score: i64,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub explanation: String,
}

fn response_schema() -> Schema {
    Schema::object([
        ("score", Schema::integer()),
        ("missing_skills", Schema::array_of(Schema::string())),
        ("matching_skills", Schema::array_of(Schema::string())),
        ("explanation", Schema::string()),
    ])
}

/// Uploads the résumé at `resume_path` and asks the model to score it against `jd`.
pub async fn score_candidate(
    jd: &str,
    resume_path: &Path,
    llm: &dyn GenerativeModel,
) -> Result<CandidateScore, AppError> {
    let file = llm.upload_file(resume_path).await?;
    info!("Uploaded resume as {}", file.name);

    let prompt = SCORE_PROMPT_TEMPLATE.replace("{jd}", jd);
    let request = GenerationRequest::new(
        vec![Part::file(&file), Part::text(prompt)],
        response_schema(),
    )
    .with_thinking_budget(THINKING_BUDGET);

    let generated = llm.generate_structured_content(request).await;

    // Best-effort: the provider expires uploads on its own.
    if let Err(e) = llm.delete_file(&file).await {
        warn!("Failed to delete uploaded resume {}: {e}", file.name);
    }

    let raw = generated?.ok_or(AppError::EmptyResponse)?;
    let score: CandidateScore = parse_json(&raw)?;

    info!("Candidate scored {}", score.score);
    Ok(score)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::testing::StubModel;

    const PLATFORM_JD: &str = "Platform Engineer: Kubernetes, Terraform, AWS, Go.";

    fn resume_path() -> &'static Path {
        Path::new("/tmp/uploads/resume.pdf")
    }

    #[tokio::test]
    async fn test_score_is_returned_without_range_validation() {
        let llm = StubModel::responding_json(json!({
            "score": 150,
            "missing_skills": ["Terraform"],
            "matching_skills": ["Go", "Kubernetes"],
            "explanation": "You cover most of the stack."
        }));

        let score = score_candidate(PLATFORM_JD, resume_path(), &llm).await.unwrap();

        assert_eq!(
            score,
            CandidateScore {
                score: 150,
                missing_skills: vec!["Terraform".to_string()],
                matching_skills: vec!["Go".to_string(), "Kubernetes".to_string()],
                explanation: "You cover most of the stack.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_request_sends_file_part_before_prompt() {
        let llm = StubModel::responding_json(json!({
            "score": 55,
            "missing_skills": [],
            "matching_skills": [],
            "explanation": "Average fit."
        }));

        score_candidate(PLATFORM_JD, resume_path(), &llm).await.unwrap();

        assert_eq!(llm.uploads(), vec![resume_path().to_path_buf()]);
        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].parts[0], Part::file(&StubModel::uploaded_file()));
        assert!(requests[0].prompt_text().contains(PLATFORM_JD));
        assert_eq!(
            requests[0].schema.required,
            vec!["score", "missing_skills", "matching_skills", "explanation"]
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_client_error_and_upload_is_cleaned() {
        let llm = StubModel::empty();

        let err = score_candidate(PLATFORM_JD, resume_path(), &llm)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Failed to generate text");
        assert_eq!(llm.deleted(), vec![StubModel::uploaded_file()]);
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_fail_scoring() {
        let llm = StubModel::responding_json(json!({
            "score": 91,
            "missing_skills": [],
            "matching_skills": ["AWS"],
            "explanation": "Great match."
        }))
        .failing_delete();

        let score = score_candidate(PLATFORM_JD, resume_path(), &llm).await.unwrap();

        assert_eq!(score.score, 91);
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed_response() {
        let llm = StubModel::responding_json(json!({ "score": 40 }));

        let err = score_candidate(PLATFORM_JD, resume_path(), &llm)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
