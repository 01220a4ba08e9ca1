//! Résumé download from share links (Dropbox, Google Drive / Docs, or any direct URL).

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{header, Client, Url};
use tracing::{debug, error, info};

use crate::errors::AppError;

pub const DEFAULT_FILENAME: &str = "downloaded_resume.pdf";

const SUPPORTED_CONTENT_TYPES: [&str; 4] = [
    "application/pdf",
    "application/octet-stream",
    "officedocument",
    "msword",
];

const RESUME_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

static GDRIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:drive|docs)\.google\.com/(?:file/d|document/d)/([a-zA-Z0-9_-]+)")
        .expect("Google Drive pattern is valid")
});

static DROPBOX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"dropbox\.com/s(?:h)?/([a-zA-Z0-9_-]+)").expect("Dropbox pattern is valid")
});

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename="?([^";]+)"?"#).expect("Content-Disposition pattern is valid")
});

/// A downloaded résumé before it is stored.
#[derive(Debug, Clone)]
pub struct DownloadedResume {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Identifier parsed from a known share link, if any.
    pub file_id: Option<String>,
}

/// Rewrites share links into direct-download URLs and pulls out the file id.
pub fn transform_download_url(resume_url: &str) -> (String, Option<String>) {
    let mut download_url = resume_url.to_string();
    let mut file_id = None;

    if let Some(caps) = DROPBOX_PATTERN.captures(resume_url) {
        file_id = Some(caps[1].to_string());
        debug!("Detected Dropbox URL, file_id={}", &caps[1]);
        if download_url.contains("?dl=0") {
            download_url = download_url.replace("?dl=0", "?dl=1");
        } else if !download_url.contains("?dl=") {
            download_url.push_str("?dl=1");
        }
    }

    if let Some(caps) = GDRIVE_PATTERN.captures(resume_url) {
        let id = caps[1].to_string();
        debug!("Detected Google Drive/Docs URL, file_id={id}");
        download_url = format!("https://drive.google.com/uc?export=download&id={id}");
        file_id = Some(id);
    }

    (download_url, file_id)
}

fn resume_filename_from_path(url: &Url) -> Option<String> {
    let last = url.path_segments()?.last()?;
    let decoded = urlencoding::decode(last).ok()?.into_owned();
    let lower = decoded.to_lowercase();
    if !decoded.is_empty() && RESUME_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Some(decoded)
    } else {
        None
    }
}

/// Picks a filename from `Content-Disposition`, then the final URL, then the URL the
/// caller asked for, falling back to [`DEFAULT_FILENAME`].
pub fn filename_from_response(
    content_disposition: Option<&str>,
    final_url: &Url,
    original_url: &str,
) -> String {
    if let Some(caps) = content_disposition.and_then(|cd| DISPOSITION_FILENAME.captures(cd)) {
        return caps[1].trim().to_string();
    }

    if let Some(name) = resume_filename_from_path(final_url) {
        return name;
    }

    Url::parse(original_url)
        .ok()
        .and_then(|url| resume_filename_from_path(&url))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

fn is_supported_content_type(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES
        .iter()
        .any(|supported| content_type.contains(supported))
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::Validation(format!(
        "Resume exceeds the maximum size of {max_bytes} bytes"
    ))
}

/// Downloads the résumé behind `resume_url`, following redirects. Bodies larger than
/// `max_bytes` are rejected without being buffered in full.
pub async fn download_resume(
    http: &Client,
    resume_url: &str,
    max_bytes: usize,
) -> Result<DownloadedResume, AppError> {
    let (download_url, file_id) = transform_download_url(resume_url);
    info!("Downloading resume from {download_url}");

    let mut response = http
        .get(&download_url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!("Resume download failed: {e}");
            AppError::Validation(format!("Failed to download resume from URL: {e}"))
        })?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!("Download Content-Type: {content_type}");

    if !is_supported_content_type(&content_type) {
        error!("Unsupported resume Content-Type: {content_type}");
        return Err(AppError::Validation(
            "URL did not return a supported file (PDF, DOC, DOCX)".to_string(),
        ));
    }

    let content_disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let filename =
        filename_from_response(content_disposition.as_deref(), response.url(), &download_url);

    if response
        .content_length()
        .is_some_and(|len| len > max_bytes as u64)
    {
        error!("Resume at {download_url} is larger than {max_bytes} bytes");
        return Err(too_large(max_bytes));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to download resume from URL: {e}")))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            error!("Resume at {download_url} is larger than {max_bytes} bytes");
            return Err(too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(DownloadedResume {
        bytes,
        filename,
        file_id,
    })
}
