use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::draft::ResumeDraft;
use crate::persistence::KeyValueStore;

/// Default quiescence window between the last mutation and the write.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(200);

struct Pending {
    generation: u64,
    snapshot: Arc<ResumeDraft>,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct SaverState {
    generation: u64,
    pending: Option<Pending>,
}

struct Inner {
    store: Arc<dyn KeyValueStore>,
    key: String,
    window: Duration,
    state: Mutex<SaverState>,
    /// Generation of the newest snapshot handed to the store. Held across
    /// each write, so writes never overlap and never go backwards.
    written: AsyncMutex<u64>,
}

impl Inner {
    async fn write(&self, generation: u64, snapshot: Arc<ResumeDraft>) {
        let mut written = self.written.lock().await;
        if generation <= *written {
            debug!("Skipping stale snapshot {generation}, {} already saved", *written);
            return;
        }
        // Drafts can carry multi-MB images; serialize and fsync on the blocking pool.
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        match tokio::task::spawn_blocking(move || write_snapshot(store.as_ref(), &key, &snapshot))
            .await
        {
            Ok(()) => *written = generation,
            Err(e) => warn!("Auto-save worker failed: {e}"),
        }
    }
}

/// Debounced snapshot writer.
///
/// Holds at most one pending timer. Each `schedule` call replaces the
/// pending snapshot and restarts the timer, so a burst of mutations inside
/// the window produces a single write of the newest snapshot. Write
/// failures are logged and dropped; the session keeps running without
/// auto-save.
#[derive(Clone)]
pub struct DebouncedSaver {
    inner: Arc<Inner>,
}

impl DebouncedSaver {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                key: key.into(),
                window,
                state: Mutex::new(SaverState::default()),
                written: AsyncMutex::new(0),
            }),
        }
    }

    /// Replaces any pending write with `snapshot` and restarts the window.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, snapshot: Arc<ResumeDraft>) {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        let generation = state.generation;

        // The timer task takes the same lock, so it cannot observe the
        // state before the new pending entry is in place.
        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.window).await;
            let due = {
                let mut state = inner.state.lock();
                let current = state
                    .pending
                    .as_ref()
                    .is_some_and(|p| p.generation == generation);
                if current {
                    state.pending.take()
                } else {
                    None
                }
            };
            if let Some(p) = due {
                inner.write(p.generation, p.snapshot).await;
            }
        });

        let previous = state.pending.replace(Pending {
            generation,
            snapshot,
            timer,
        });
        if let Some(previous) = previous {
            previous.timer.abort();
        }
    }

    /// Writes the pending snapshot now, if any. Returns whether a write was attempted.
    /// Waits for a write already in flight to finish first.
    pub async fn flush(&self) -> bool {
        let due = self.inner.state.lock().pending.take();
        match due {
            Some(p) => {
                p.timer.abort();
                self.inner.write(p.generation, p.snapshot).await;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }
}

fn write_snapshot(store: &dyn KeyValueStore, key: &str, snapshot: &ResumeDraft) {
    let raw = match serde_json::to_string(snapshot) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping auto-save, draft could not be serialized: {e}");
            return;
        }
    };
    match store.put(key, &raw) {
        Ok(()) => debug!("Saved draft '{key}' ({} bytes)", raw.len()),
        Err(e) => warn!("Auto-save of '{key}' failed: {e}"),
    }
}
