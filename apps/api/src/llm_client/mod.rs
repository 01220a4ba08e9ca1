/// LLM Client: the single point of entry for all Gemini API calls in jdmatch.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Handlers depend on the `GenerativeModel` trait so tests can swap in a stub.
///
/// Model: gemini-2.5-flash (hardcoded, not configurable)
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod schema;

pub use schema::Schema;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for all LLM calls in jdmatch, including browser extraction.
pub const MODEL: &str = "gemini-2.5-flash";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_LOW_AND_ABOVE";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload session was not granted an upload URL")]
    MissingUploadUrl,
}

// ────────────────────────────────────────────────────────────────────────────
// Request content
// ────────────────────────────────────────────────────────────────────────────

/// A file stored with the provider, addressable from a content part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

/// One part of a user turn: either prompt text or an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn file(file: &FileRef) -> Self {
        Part::File {
            file_data: FileData {
                file_uri: file.uri.clone(),
                mime_type: file.mime_type.clone(),
            },
        }
    }
}

/// A schema-constrained generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
    pub schema: Schema,
    /// Token budget for model thinking. `Some(-1)` lets the model decide.
    pub thinking_budget: Option<i32>,
}

impl GenerationRequest {
    pub fn new(parts: Vec<Part>, schema: Schema) -> Self {
        Self {
            parts,
            schema,
            thinking_budget: None,
        }
    }

    pub fn with_thinking_budget(mut self, budget: i32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Concatenated text of all text parts.
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::File { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capability trait
// ────────────────────────────────────────────────────────────────────────────

/// Minimal capability surface the handlers need from a generative-model provider.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Runs a JSON-constrained generation and returns the raw response text.
    /// `Ok(None)` means the call succeeded but the model produced no text.
    async fn generate_structured_content(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, LlmError>;

    /// Uploads a local file to the provider's file store.
    async fn upload_file(&self, path: &Path) -> Result<FileRef, LlmError>;

    /// Removes a previously uploaded file.
    async fn delete_file(&self, file: &FileRef) -> Result<(), LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig<'a>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: &'a [Part],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenates the non-thought text parts of the first candidate.
    /// Returns `None` when there is no text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileRef,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The Gemini client used by all handlers in jdmatch.
/// Wraps `generateContent` with structured-output helpers and the Files API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, GEMINI_API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Makes a raw `generateContent` call, returning the full response object.
    pub async fn call(&self, request: &GenerationRequest) -> Result<GeminiResponse, LlmError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: &request.parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let gemini_response: GeminiResponse = response.json().await?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(gemini_response)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_structured_content(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, LlmError> {
        let response = self.call(&request).await?;
        Ok(response.text())
    }

    /// Two-step resumable upload: open a session, then send the bytes and finalize.
    async fn upload_file(&self, path: &Path) -> Result<FileRef, LlmError> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        let start = self
            .client
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", &mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or(LlmError::MissingUploadUrl)?
            .to_string();

        let finalize = self
            .client
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;
        let finalize = check_status(finalize).await?;

        let uploaded: UploadResponse = finalize.json().await?;
        debug!("Uploaded {} as {}", display_name, uploaded.file.name);
        Ok(uploaded.file)
    }

    async fn delete_file(&self, file: &FileRef) -> Result<(), LlmError> {
        let response = self
            .client
            .delete(format!("{}/v1beta/{}", self.base_url, file.name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Maps non-2xx responses to `LlmError::Api`, preferring the provider's own message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Deserializes model output as JSON.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
