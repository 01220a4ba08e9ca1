//! JD Classifier: asks the model whether a block of text is a job description.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jd::prompts::JD_CLASSIFY_PROMPT_TEMPLATE;
use crate::llm_client::{parse_json, GenerationRequest, GenerativeModel, Part, Schema};

const THINKING_BUDGET: i32 = 2500;

/// The model's verdict on a block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "isJD")]
    pub is_jd: bool,
    pub reason: String,
}

fn response_schema() -> Schema {
    Schema::object([("isJD", Schema::boolean()), ("reason", Schema::string())])
}

/// Returns `text` unchanged if the model reads it as a job description, otherwise
/// fails with the model's stated reason.
pub async fn classify_job_description(
    text: &str,
    llm: &dyn GenerativeModel,
) -> Result<String, AppError> {
    let prompt = JD_CLASSIFY_PROMPT_TEMPLATE.replace("{text}", text);
    let request = GenerationRequest::new(vec![Part::text(prompt)], response_schema())
        .with_thinking_budget(THINKING_BUDGET);

    let raw = llm
        .generate_structured_content(request)
        .await?
        .ok_or(AppError::EmptyResponse)?;

    let verdict: ClassificationResult = parse_json(&raw)?;

    if !verdict.is_jd {
        info!("Text rejected as a job description: {}", verdict.reason);
        return Err(AppError::NotAJobDescription(verdict.reason));
    }

    Ok(text.to_string())
}
