// Résumé intake: accept an upload or a share link, normalise Word files to PDF,
// and park the bytes in a temporary file for the scorer.

pub mod convert;
pub mod download;

use std::path::Path;

use anyhow::Context;
use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::convert::{convert_to_pdf, needs_pdf_conversion, pdf_filename};
use crate::resume::download::{download_resume, DEFAULT_FILENAME};

/// Largest résumé accepted, whether uploaded or downloaded. Raises axum's 2 MB default.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

const WORD_UNSUPPORTED_MESSAGE: &str =
    "DOC/DOCX resumes cannot be converted on this server; please provide a PDF";

/// Where the résumé comes from.
#[derive(Debug)]
pub enum ResumeSource {
    Upload {
        filename: Option<String>,
        bytes: Vec<u8>,
    },
    Url(String),
}

/// A résumé on local disk. The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct StoredResume {
    file: NamedTempFile,
    pub file_id: String,
    pub filename: String,
}

impl StoredResume {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Resolves the source to bytes, converts Word documents to PDF (rejecting them when
/// no converter is configured), and writes the result to a temporary file.
pub async fn intake_resume(
    source: ResumeSource,
    http: &Client,
    doc_to_pdf_api_url: Option<&str>,
) -> Result<StoredResume, AppError> {
    let (bytes, filename, file_id) = match source {
        ResumeSource::Upload { filename, bytes } => {
            let filename = filename
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
            info!("Processing uploaded resume {filename}");
            (bytes, filename, Uuid::new_v4().to_string())
        }
        ResumeSource::Url(url) => {
            info!("Processing resume_url {url}");
            let downloaded = download_resume(http, &url, MAX_RESUME_BYTES).await?;
            let file_id = downloaded
                .file_id
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            (downloaded.bytes, downloaded.filename, file_id)
        }
    };

    if bytes.is_empty() {
        return Err(AppError::Validation("No file content provided".to_string()));
    }

    // The model only reads PDFs, so Word files must be converted first.
    let (bytes, filename) = match (needs_pdf_conversion(&filename), doc_to_pdf_api_url) {
        (true, Some(api_url)) => {
            let pdf = convert_to_pdf(http, api_url, &filename, bytes).await?;
            (pdf, pdf_filename(&filename))
        }
        (true, None) => {
            warn!("Rejecting {filename}: no DOC/DOCX converter configured");
            return Err(AppError::Validation(WORD_UNSUPPORTED_MESSAGE.to_string()));
        }
        (false, _) => (bytes, filename),
    };

    store(bytes, filename, file_id).await
}

async fn store(bytes: Vec<u8>, filename: String, file_id: String) -> Result<StoredResume, AppError> {
    let suffix = Path::new(&filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix(&format!("{file_id}-"))
        .suffix(&suffix)
        .tempfile()
        .context("Failed to create temporary resume file")?;

    tokio::fs::write(file.path(), &bytes)
        .await
        .context("Failed to write resume to disk")?;

    info!("Stored resume {filename} at {}", file.path().display());

    Ok(StoredResume {
        file,
        file_id,
        filename,
    })
}
