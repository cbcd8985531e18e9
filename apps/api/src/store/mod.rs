// Form state store: single owner of the live draft.
// Every mutation publishes a new immutable snapshot and schedules a debounced save.

pub mod handlers;
pub mod ingest;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::draft::{FieldPath, ImageSlot, ResumeDraft, RowList, SetField};
use crate::persistence::DebouncedSaver;
use crate::store::ingest::{accepted_kind, DecodeError, ImageDecoder, IngestError, UploadedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// A new snapshot was published.
    Applied,
    /// The request did not change the draft.
    Ignored,
}

impl UpdateOutcome {
    pub fn applied(self) -> bool {
        self == UpdateOutcome::Applied
    }
}

/// Result of handing a file to [`FormStore::ingest_file`].
#[derive(Debug)]
pub enum Ingestion {
    /// No file was given; the slot was cleared synchronously.
    Cleared(UpdateOutcome),
    /// Decoding continues in the background. Awaiting the handle is optional.
    Decoding(JoinHandle<Result<UpdateOutcome, DecodeError>>),
}

pub struct FormStore {
    current: RwLock<Arc<ResumeDraft>>,
    saver: DebouncedSaver,
    decoder: Arc<dyn ImageDecoder>,
}

impl FormStore {
    /// Wraps the draft loaded at startup. Loading itself never schedules a save.
    pub fn new(initial: ResumeDraft, saver: DebouncedSaver, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            saver,
            decoder,
        }
    }

    /// The current published snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ResumeDraft> {
        Arc::clone(&self.current.read())
    }

    /// Applies `op` to the current snapshot under the write lock, so
    /// mutations never interleave. `None` from `op` leaves everything as is.
    fn commit<F>(&self, op: F) -> UpdateOutcome
    where
        F: FnOnce(&ResumeDraft) -> Option<ResumeDraft>,
    {
        let mut current = self.current.write();
        match op(&current) {
            Some(next) => {
                let next = Arc::new(next);
                *current = Arc::clone(&next);
                self.saver.schedule(next);
                UpdateOutcome::Applied
            }
            None => UpdateOutcome::Ignored,
        }
    }

    pub fn update(&self, path: &FieldPath, value: &Value) -> UpdateOutcome {
        let outcome = self.commit(|draft| draft.with_value(path, value));
        if !outcome.applied() {
            warn!("Ignoring update to unresolvable path '{path}'");
        }
        outcome
    }

    pub fn toggle_set_member(&self, field: SetField, item: &str) -> UpdateOutcome {
        let outcome = self.commit(|draft| draft.with_toggled(field, item));
        if !outcome.applied() {
            debug!("{field:?} is full, not adding '{item}'");
        }
        outcome
    }

    pub fn append_row(&self, list: RowList, max_len: usize) -> UpdateOutcome {
        let outcome = self.commit(|draft| draft.with_appended_row(list, max_len));
        if !outcome.applied() {
            debug!("{list:?} already has {max_len} rows");
        }
        outcome
    }

    /// Ingests an image upload into `slot`.
    ///
    /// An absent file clears the slot. A file of an unaccepted type is
    /// rejected before any work starts and leaves the draft untouched.
    pub fn ingest_file(
        self: &Arc<Self>,
        slot: ImageSlot,
        file: Option<UploadedFile>,
    ) -> Result<Ingestion, IngestError> {
        let Some(file) = file else {
            let outcome = self.commit(|draft| Some(draft.with_image(slot, None)));
            return Ok(Ingestion::Cleared(outcome));
        };

        let target = slot.path();
        let kind = accepted_kind(&file).map_err(|e| {
            warn!("Rejected upload for '{target}': {e}");
            e
        })?;

        debug!(
            "Decoding {} byte upload {:?} for '{target}'",
            file.bytes.len(),
            file.file_name
        );

        let store = Arc::clone(self);
        let task = tokio::spawn(async move {
            match store.decoder.decode(kind, file.bytes).await {
                Ok(image) => Ok(store.commit(|draft| Some(draft.with_image(slot, Some(image))))),
                Err(e) => {
                    warn!("Could not decode upload for '{target}': {e}");
                    Err(e)
                }
            }
        });
        Ok(Ingestion::Decoding(task))
    }

    /// Writes any pending snapshot immediately. Used at shutdown.
    pub async fn flush(&self) -> bool {
        self.saver.flush().await
    }
}
