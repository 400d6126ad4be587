//! Multipart upload parsing, filename sanitization, and scoped staging.

pub mod sanitize;
mod staging;

pub use sanitize::secure_filename;
pub use staging::{StagedUpload, UploadStore};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

/// Multipart field that carries the report.
pub const FILE_FIELD: &str = "file";

/// Client input errors raised before any processing starts.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The form contained no `file` field.
    #[error("No file uploaded")]
    MissingFile,
    /// The `file` field carried no filename or an empty one.
    #[error("No selected file")]
    EmptyFilename,
    /// The filename contained nothing usable after sanitization.
    #[error("Invalid filename")]
    InvalidFilename,
    /// The request body exceeded the configured upload limit.
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
    /// The multipart stream could not be read.
    #[error("Failed to read multipart upload: {0}")]
    Multipart(String),
}

impl UploadError {
    /// HTTP status reported to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(error.body_text())
        } else {
            Self::Multipart(error.body_text())
        }
    }
}

/// A single uploaded report: its sanitized filename and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    file_name: String,
    data: Vec<u8>,
}

impl UploadedFile {
    /// Validate and sanitize a client-supplied filename before accepting the bytes.
    pub fn new(raw_file_name: &str, data: Vec<u8>) -> Result<Self, UploadError> {
        if raw_file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        let file_name = secure_filename(raw_file_name);
        if file_name.is_empty() {
            return Err(UploadError::InvalidFilename);
        }
        Ok(Self { file_name, data })
    }

    /// Sanitized filename, safe to use as a path component.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw uploaded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Read the multipart form and return the first `file` field as an [`UploadedFile`].
///
/// Other fields are drained and ignored. A `file` part without a `filename` parameter is a plain
/// form value, not an upload, and is ignored too.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let file_name = match field.file_name() {
            Some(file_name) if upload.is_none() && field.name() == Some(FILE_FIELD) => {
                file_name.to_string()
            }
            _ => {
                field.bytes().await?;
                continue;
            }
        };

        let data = field.bytes().await?.to_vec();
        upload = Some((file_name, data));
    }

    let (file_name, data) = upload.ok_or(UploadError::MissingFile)?;
    UploadedFile::new(&file_name, data)
}
