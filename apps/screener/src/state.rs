use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extraction + ranking pipeline. Holds the loaded encoder and the
    /// annotation client; built once at startup and never mutated.
    pub screener: Arc<Screener>,
}
