//! Browser automation: a natural-language agent driving a headless browser.
//!
//! Handlers only see the `BrowsingAgent` / `BrowserSession` traits. Sessions must be
//! acquired through [`with_session`], which closes them on every exit path.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod stagehand;

pub use stagehand::StagehandAgent;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent error (status {status}): {message}")]
    Agent { status: u16, message: String },

    #[error("Agent reported failure: {0}")]
    Rejected(String),

    #[error("Navigation to {url} timed out after {} ms", timeout.as_millis())]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the browser executable comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserEnvironment {
    /// A developer machine: use the configured executable path.
    Local,
    /// A deployed build: use the browser bundled with the agent.
    #[default]
    Packaged,
}

impl FromStr for BrowserEnvironment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "development" => Ok(BrowserEnvironment::Local),
            "packaged" | "production" => Ok(BrowserEnvironment::Packaged),
            other => Err(anyhow::anyhow!(
                "BROWSER_ENV must be 'local' or 'packaged', got '{other}'"
            )),
        }
    }
}

/// Explicit configuration injected into the extractor.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub browser_executable_path: Option<PathBuf>,
    pub environment: BrowserEnvironment,
}

impl AgentConfig {
    /// `None` lets the agent fall back to its bundled browser.
    pub fn executable_path(&self) -> Option<PathBuf> {
        match self.environment {
            BrowserEnvironment::Local => self.browser_executable_path.clone(),
            BrowserEnvironment::Packaged => None,
        }
    }

    pub fn launch_options(&self, model: &str) -> LaunchOptions {
        LaunchOptions {
            api_key: self.api_key.clone(),
            executable_path: self.executable_path(),
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub api_key: String,
    pub executable_path: Option<PathBuf>,
    pub model: String,
}

/// An open browser session. Instructions are interpreted by the agent, not by us.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    async fn act(&mut self, instruction: &str) -> Result<(), BrowserError>;

    async fn extract(
        &mut self,
        instruction: &str,
        schema: &Value,
        model: &str,
    ) -> Result<Value, BrowserError>;

    async fn close(&mut self) -> Result<(), BrowserError>;
}

pub type SessionHandle = Box<dyn BrowserSession>;

#[async_trait]
pub trait BrowsingAgent: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<SessionHandle, BrowserError>;
}

/// Owns an open session until it is closed. Dropping it unclosed (a cancelled caller
/// or a panic inside the work) hands the close to a background task.
struct SessionGuard {
    session: Option<SessionHandle>,
}

impl SessionGuard {
    fn session(&mut self) -> &mut SessionHandle {
        self.session
            .as_mut()
            .expect("session is held until the guard closes it")
    }

    async fn close(mut self) {
        if let Some(mut session) = self.session.take() {
            close_logged(session.as_mut()).await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        warn!("Browser session abandoned before close; closing in background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { close_logged(session.as_mut()).await });
            }
            Err(_) => warn!("No async runtime left to close the browser session"),
        }
    }
}

async fn close_logged(session: &mut dyn BrowserSession) {
    if let Err(e) = session.close().await {
        warn!("Failed to close browser session: {e}");
    } else {
        debug!("Browser session closed");
    }
}

/// Launches a session, runs `work` against it, and closes it exactly once no matter
/// how `work` finishes, including when this future is dropped or `work` panics.
/// A failed close is logged; the work's own outcome is returned.
pub async fn with_session<T, F>(
    agent: &dyn BrowsingAgent,
    options: &LaunchOptions,
    work: F,
) -> Result<T, BrowserError>
where
    T: Send,
    F: for<'s> FnOnce(&'s mut SessionHandle) -> BoxFuture<'s, Result<T, BrowserError>> + Send,
{
    let mut guard = SessionGuard {
        session: Some(agent.launch(options).await?),
    };
    debug!("Browser session opened");

    let outcome = work(guard.session()).await;
    guard.close().await;

    outcome
}
