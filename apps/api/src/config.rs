use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::browser::{AgentConfig, BrowserEnvironment};

const DEFAULT_STAGEHAND_API_URL: &str = "http://localhost:3000/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub chrome_path: Option<PathBuf>,
    pub browser_env: BrowserEnvironment,
    pub stagehand_api_url: String,
    pub doc_to_pdf_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let browser_env = match std::env::var("BROWSER_ENV") {
            Ok(value) => BrowserEnvironment::from_str(&value)?,
            Err(_) => BrowserEnvironment::Packaged,
        };
        let chrome_path = optional_env("CHROME_PATH").map(PathBuf::from);

        if browser_env == BrowserEnvironment::Local && chrome_path.is_none() {
            bail!("CHROME_PATH must be set when BROWSER_ENV=local");
        }

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            chrome_path,
            browser_env,
            stagehand_api_url: optional_env("STAGEHAND_API_URL")
                .unwrap_or_else(|| DEFAULT_STAGEHAND_API_URL.to_string()),
            doc_to_pdf_api_url: optional_env("DOC_TO_PDF_API_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The explicit configuration handed to the browser extractor.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            api_key: self.gemini_api_key.clone(),
            browser_executable_path: self.chrome_path.clone(),
            environment: self.browser_env,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
