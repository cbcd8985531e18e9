use std::sync::Arc;

use crate::config::Config;
use crate::export::Exporter;
use crate::store::FormStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single owner of the live draft.
    pub store: Arc<FormStore>,
    /// Receives the draft once it passes every submit rule. Default: JsonFileExporter.
    pub exporter: Arc<dyn Exporter>,
    pub config: Config,
}
