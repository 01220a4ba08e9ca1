//! Word documents are converted to PDF through a Gotenberg-compatible LibreOffice endpoint.

use std::path::Path;

use anyhow::anyhow;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{error, info};

use crate::errors::AppError;

pub fn needs_pdf_conversion(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.ends_with(".doc") || lower.ends_with(".docx")
}

pub fn pdf_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    format!("{stem}.pdf")
}

/// Posts the document to `{api_url}/forms/libreoffice/convert` and returns the PDF bytes.
pub async fn convert_to_pdf(
    http: &Client,
    api_url: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<Vec<u8>, AppError> {
    let url = format!("{}/forms/libreoffice/convert", api_url.trim_end_matches('/'));
    info!("Converting {filename} to PDF via {url}");

    let form = Form::new().part("files", Part::bytes(bytes).file_name(filename.to_string()));

    let response = http
        .post(&url)
        .multipart(form)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!("Failed to convert {filename} to PDF: {e}");
            AppError::Internal(anyhow!("Failed to convert document to PDF: {e}"))
        })?;

    let pdf = response
        .bytes()
        .await
        .map_err(|e| AppError::Internal(anyhow!("Failed to convert document to PDF: {e}")))?;

    Ok(pdf.to_vec())
}
