//! File-to-data-URL ingestion for the image slots.
//!
//! The MIME check happens synchronously when the upload arrives; decoding
//! runs as a detached task and publishes its result with a normal store
//! update once finished. Two uploads racing on the same slot resolve by
//! completion order: whichever decode finishes last wins.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use thiserror::Error;

use crate::draft::{ImageData, ImageKind};

/// An uploaded file as received at the boundary.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Only JPG/PNG images are allowed (got '{0}')")]
    UnsupportedType(String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("File content does not look like {declared}")]
    SignatureMismatch { declared: &'static str },

    #[error("Decode worker failed: {0}")]
    Worker(String),
}

/// Checks the declared type of an upload against the accepted set.
pub fn accepted_kind(file: &UploadedFile) -> Result<ImageKind, IngestError> {
    file.content_type
        .as_deref()
        .and_then(ImageKind::from_mime)
        .ok_or_else(|| {
            IngestError::UnsupportedType(
                file.content_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })
}

/// Turns raw image bytes into a self-contained image reference.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, kind: ImageKind, bytes: Bytes) -> Result<ImageData, DecodeError>;
}

/// Default decoder: signature check plus base64 encoding on the blocking pool.
pub struct DataUrlDecoder;

#[async_trait]
impl ImageDecoder for DataUrlDecoder {
    async fn decode(&self, kind: ImageKind, bytes: Bytes) -> Result<ImageData, DecodeError> {
        // Base64 over a multi-megabyte photo is CPU-bound; keep it off the executor.
        tokio::task::spawn_blocking(move || encode_data_url(kind, &bytes))
            .await
            .map_err(|e| DecodeError::Worker(e.to_string()))?
    }
}

pub fn encode_data_url(kind: ImageKind, bytes: &[u8]) -> Result<ImageData, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if !bytes.starts_with(kind.signature()) {
        return Err(DecodeError::SignatureMismatch {
            declared: kind.mime(),
        });
    }
    Ok(ImageData::from_parts(kind, &STANDARD.encode(bytes)))
}
