//! JD input routing: a submitted JD is either a link to a posting or the text itself.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::browser::{AgentConfig, BrowsingAgent};
use crate::errors::AppError;
use crate::jd::classifier::classify_job_description;
use crate::jd::extractor::extract_job_description;
use crate::llm_client::GenerativeModel;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?([\w-]+\.)+[\w-]+(/[\w\-._~:/?#\[\]@!$&'()*+,;=]*)?$")
        .expect("URL pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JdResolution {
    pub jd_info: String,
    pub is_link: bool,
}

/// True when the trimmed input looks like a URL rather than prose.
pub fn is_jd_link(text: &str) -> bool {
    URL_PATTERN.is_match(text.trim())
}

fn with_scheme(link: &str) -> String {
    let lower = link.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

/// Links are extracted through the browser agent; anything else is classified as-is.
pub async fn resolve_job_description(
    input: &str,
    llm: &dyn GenerativeModel,
    agent: &dyn BrowsingAgent,
    config: &AgentConfig,
) -> Result<JdResolution, AppError> {
    if is_jd_link(input) {
        let url = with_scheme(input.trim());
        let jd_info = extract_job_description(&url, agent, config).await?;
        return Ok(JdResolution {
            jd_info,
            is_link: true,
        });
    }

    let jd_info = classify_job_description(input, llm).await?;
    Ok(JdResolution {
        jd_info,
        is_link: false,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::browser::BrowserEnvironment;
    use crate::testing::{StubAgent, StubModel};

    fn config() -> AgentConfig {
        AgentConfig {
            api_key: "gemini-key".to_string(),
            browser_executable_path: None,
            environment: BrowserEnvironment::Packaged,
        }
    }

    #[test]
    fn test_detects_links() {
        assert!(is_jd_link("https://boards.greenhouse.io/acme/jobs/123"));
        assert!(is_jd_link("  http://careers.example.com/apply?id=7#top  "));
        assert!(is_jd_link("jobs.lever.co/acme/5f2c"));
        assert!(is_jd_link("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn test_prose_is_not_a_link() {
        assert!(!is_jd_link("We are hiring a Senior Backend Engineer."));
        assert!(!is_jd_link("localhost"));
        assert!(!is_jd_link("https://example.com/has space"));
        assert!(!is_jd_link(""));
    }

    #[test]
    fn test_with_scheme_adds_https_only_when_missing() {
        assert_eq!(with_scheme("jobs.example.com/1"), "https://jobs.example.com/1");
        assert_eq!(with_scheme("http://jobs.example.com/1"), "http://jobs.example.com/1");
    }

    #[tokio::test]
    async fn test_link_is_routed_to_extractor() {
        let llm = StubModel::empty();
        let agent = StubAgent::succeeding("Own the billing platform.");

        let resolved = resolve_job_description("jobs.example.com/billing", &llm, &agent, &config())
            .await
            .unwrap();

        assert_eq!(
            resolved,
            JdResolution {
                jd_info: "Own the billing platform.".to_string(),
                is_link: true,
            }
        );
        assert_eq!(agent.actions()[0], "navigate https://jobs.example.com/billing");
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_text_is_routed_to_classifier() {
        let text = "Data Engineer. You will build Spark pipelines. Requirements: Python, SQL.";
        let llm = StubModel::responding_json(json!({ "isJD": true, "reason": "" }));
        let agent = StubAgent::succeeding("unused");

        let resolved = resolve_job_description(text, &llm, &agent, &config())
            .await
            .unwrap();

        assert_eq!(resolved.jd_info, text);
        assert!(!resolved.is_link);
        assert!(agent.launches().is_empty());
    }
}
