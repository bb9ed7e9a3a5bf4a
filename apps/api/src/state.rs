use std::sync::Arc;

use crate::catalog::{PhotoCatalog, PhotoResolver};
use crate::config::Config;
use crate::render::DocumentRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds collaborators only. Run state (the used-image set, the catalog
/// snapshot) is created per request and never stored here.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL `media` table, or an in-memory catalog when no database is configured.
    pub catalog: Arc<dyn PhotoCatalog>,
    pub resolver: Arc<dyn PhotoResolver>,
    /// HTML passthrough by default; external PDF command when RENDER_COMMAND is set.
    pub renderer: Arc<dyn DocumentRenderer>,
    pub config: Config,
}
