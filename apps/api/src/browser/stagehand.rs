//! HTTP client for a Stagehand-compatible browser agent.
//!
//! Every call goes through the session API with streaming disabled; responses share the
//! `{ success, data, message }` envelope.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{BrowserError, BrowserSession, BrowsingAgent, LaunchOptions, SessionHandle};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartData {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct ExtractData {
    result: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    model_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_browser_launch_options: Option<LocalLaunch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocalLaunch {
    executable_path: String,
    headless: bool,
}

/// Launches sessions against a Stagehand-compatible API.
#[derive(Clone)]
pub struct StagehandAgent {
    client: Client,
    base_url: String,
}

impl StagehandAgent {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BrowsingAgent for StagehandAgent {
    async fn launch(&self, options: &LaunchOptions) -> Result<SessionHandle, BrowserError> {
        let body = StartRequest {
            model_name: &options.model,
            local_browser_launch_options: options.executable_path.as_ref().map(|path| {
                LocalLaunch {
                    executable_path: path.to_string_lossy().into_owned(),
                    headless: true,
                }
            }),
        };

        let started: StartData = require_data(
            post_envelope(
                &self.client,
                &format!("{}/sessions/start", self.base_url),
                &options.api_key,
                &body,
            )
            .await?,
        )?;

        info!("Started browser session {}", started.session_id);

        Ok(Box::new(StagehandSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            api_key: options.api_key.clone(),
            session_id: started.session_id,
        }))
    }
}

pub struct StagehandSession {
    client: Client,
    base_url: String,
    api_key: String,
    session_id: String,
}

impl StagehandSession {
    fn endpoint(&self, action: &str) -> String {
        format!("{}/sessions/{}/{}", self.base_url, self.session_id, action)
    }
}

#[async_trait]
impl BrowserSession for StagehandSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        let body = json!({
            "url": url,
            "options": { "timeout": timeout.as_millis() as u64 }
        });
        post_envelope::<_, Value>(&self.client, &self.endpoint("navigate"), &self.api_key, &body)
            .await?;
        Ok(())
    }

    async fn act(&mut self, instruction: &str) -> Result<(), BrowserError> {
        let body = json!({ "input": instruction });
        post_envelope::<_, Value>(&self.client, &self.endpoint("act"), &self.api_key, &body)
            .await?;
        Ok(())
    }

    async fn extract(
        &mut self,
        instruction: &str,
        schema: &Value,
        model: &str,
    ) -> Result<Value, BrowserError> {
        let body = json!({
            "instruction": instruction,
            "schema": schema,
            "options": { "model": { "modelName": model } }
        });
        let data: ExtractData = require_data(
            post_envelope(&self.client, &self.endpoint("extract"), &self.api_key, &body).await?,
        )?;
        Ok(data.result)
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        post_envelope::<_, Value>(&self.client, &self.endpoint("end"), &self.api_key, &json!({}))
            .await?;
        info!("Ended browser session {}", self.session_id);
        Ok(())
    }
}

async fn post_envelope<B, T>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<Option<T>, BrowserError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = client
        .post(url)
        .header("x-model-api-key", api_key)
        .header("x-stream-response", "false")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<Value>>(&text)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(text);
        return Err(BrowserError::Agent {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&text)?;
    if !envelope.success {
        return Err(BrowserError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "agent reported failure".to_string()),
        ));
    }

    Ok(envelope.data)
}

fn require_data<T>(data: Option<T>) -> Result<T, BrowserError> {
    data.ok_or_else(|| BrowserError::Rejected("agent response had no data".to_string()))
}
