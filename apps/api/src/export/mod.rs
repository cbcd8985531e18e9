//! Export boundary: hands a validated draft to an external collaborator.
//!
//! The form core never knows how a resume is rendered. [`generate`] runs the
//! submit rules and only calls the exporter when the error map is empty.
//!
//! `AppState` holds an `Arc<dyn Exporter>`; the default writes the draft as a
//! JSON document under `EXPORT_DIR`.

pub mod handlers;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::draft::ResumeDraft;
use crate::validation::{validate, ErrorMap};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub export_id: Uuid,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum GenerateOutcome {
    /// Submit was blocked; nothing reached the exporter.
    Invalid(ErrorMap),
    Exported(ExportReceipt),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(&self, draft: &ResumeDraft) -> Result<ExportReceipt, ExportError>;
}

/// Validates `draft` and exports it when no rule fails.
pub async fn generate(
    draft: &ResumeDraft,
    exporter: &dyn Exporter,
) -> Result<GenerateOutcome, ExportError> {
    let errors = validate(draft);
    if !errors.is_empty() {
        info!(
            "Generate blocked by {} error(s), first: {:?}",
            errors.len(),
            errors.first_error()
        );
        return Ok(GenerateOutcome::Invalid(errors));
    }
    let receipt = exporter.export(draft).await?;
    Ok(GenerateOutcome::Exported(receipt))
}

// ────────────────────────────────────────────────────────────────────────────
// JsonFileExporter
// ────────────────────────────────────────────────────────────────────────────

/// Writes each export as pretty JSON to `<dir>/resume-<timestamp>-<id>.json`.
pub struct JsonFileExporter {
    dir: PathBuf,
}

impl JsonFileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Exporter for JsonFileExporter {
    async fn export(&self, draft: &ResumeDraft) -> Result<ExportReceipt, ExportError> {
        let export_id = Uuid::new_v4();
        let created_at = Utc::now();
        let body = serde_json::to_vec_pretty(draft)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!(
            "resume-{}-{export_id}.json",
            created_at.format("%Y%m%dT%H%M%SZ")
        ));
        tokio::fs::write(&path, body).await?;

        info!("Exported resume {export_id} to {}", path.display());
        Ok(ExportReceipt {
            export_id,
            location: path.display().to_string(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::fixtures::{set, submittable_draft};
    use crate::validation::ErrorKey;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingExporter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Exporter for CountingExporter {
        async fn export(&self, _draft: &ResumeDraft) -> Result<ExportReceipt, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExportReceipt {
                export_id: Uuid::nil(),
                location: "memory".to_string(),
                created_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_exporter() {
        let exporter = CountingExporter::default();
        let draft = set(submittable_draft(), "personal.name", json!(""));

        let outcome = generate(&draft, &exporter).await.unwrap();
        match outcome {
            GenerateOutcome::Invalid(errors) => {
                assert_eq!(errors.first_error(), Some(ErrorKey::Name));
            }
            GenerateOutcome::Exported(_) => panic!("invalid draft was exported"),
        }
        assert_eq!(exporter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_draft_is_exported_once() {
        let exporter = CountingExporter::default();
        let outcome = generate(&submittable_draft(), &exporter).await.unwrap();
        assert!(matches!(outcome, GenerateOutcome::Exported(_)));
        assert_eq!(exporter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_json_file_exporter_writes_readable_draft() {
        let dir = TempDir::new().unwrap();
        let exporter = JsonFileExporter::new(dir.path().join("exports"));
        let draft = submittable_draft();

        let receipt = exporter.export(&draft).await.unwrap();
        assert!(receipt.location.ends_with(&format!("{}.json", receipt.export_id)));

        let raw = std::fs::read_to_string(&receipt.location).unwrap();
        let written: ResumeDraft = serde_json::from_str(&raw).unwrap();
        assert_eq!(written, draft);
    }
}
