use std::sync::Arc;

use crate::claims::store::ClaimStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Claim storage backend. In-memory by default, PostgreSQL when `DATABASE_URL` is set.
    pub store: Arc<dyn ClaimStore>,
    pub config: Config,
}
