//! JD Extractor: pulls job-description text out of a live webpage via the browser agent.
//!
//! Sequence: launch → navigate (bounded) → dismiss dialogs → extract → close.
//! The session is closed by `with_session` before the extraction result is evaluated.

use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::browser::{with_session, AgentConfig, BrowserError, BrowsingAgent};
use crate::errors::AppError;
use crate::jd::prompts::{DISMISS_DIALOG_INSTRUCTION, JD_EXTRACT_INSTRUCTION};
use crate::llm_client::MODEL;

pub const NAVIGATION_TIMEOUT: Duration = Duration::from_millis(60_000);

const ERROR_MESSAGE: &str = "ERROR";

/// What the agent reports back from the extraction instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub message: String,
    pub data: String,
}

impl ExtractionResult {
    pub fn is_error(&self) -> bool {
        self.message == ERROR_MESSAGE
    }
}

fn extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" },
            "data": { "type": "string" }
        },
        "required": ["message", "data"]
    })
}

/// Navigates to `url` and returns the extracted job-description text, or fails with
/// the agent's stated reason.
pub async fn extract_job_description(
    url: &str,
    agent: &dyn BrowsingAgent,
    config: &AgentConfig,
) -> Result<String, AppError> {
    let options = config.launch_options(MODEL);
    let target = url.to_string();

    let extraction = with_session(agent, &options, move |session| {
        async move {
            tokio::time::timeout(NAVIGATION_TIMEOUT, session.navigate(&target, NAVIGATION_TIMEOUT))
                .await
                .map_err(|_| BrowserError::NavigationTimeout {
                    url: target.clone(),
                    timeout: NAVIGATION_TIMEOUT,
                })??;
            info!("Navigated to {target}");

            session.act(DISMISS_DIALOG_INSTRUCTION).await?;
            info!("Dismissed dialogs on {target}");

            let raw = session
                .extract(JD_EXTRACT_INSTRUCTION, &extraction_schema(), MODEL)
                .await?;
            let extraction: ExtractionResult = serde_json::from_value(raw)?;
            Ok::<_, BrowserError>(extraction)
        }
        .boxed()
    })
    .await?;

    info!("Extraction for {url} finished with message {}", extraction.message);

    if extraction.is_error() {
        return Err(AppError::ExtractionFailed(extraction.data));
    }

    Ok(extraction.data)
}
