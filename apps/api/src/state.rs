use std::sync::Arc;

use crate::analysis::session::{InMemorySessionStore, SessionStore};
use crate::analysis::weights::DimensionWeights;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable session backend. Default: InMemorySessionStore.
    pub sessions: Arc<dyn SessionStore>,
    /// Weighting table used when a request does not supply its own.
    pub weights: Arc<DimensionWeights>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new(
            config.max_sessions,
            config.session_ttl(),
        ));
        Self {
            config,
            sessions,
            weights: Arc::new(DimensionWeights::default()),
        }
    }
}
