//! Analysis sessions: accumulate dimension-completion events as they stream in.
//!
//! Events arrive one per dimension in any order. Applying an event replaces that
//! dimension's raw result (last write wins); scoring always runs over a snapshot.
//!
//! `SessionStore` is carried in `AppState` as `Arc<dyn SessionStore>` so the
//! in-memory backend can be swapped without touching handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::dimension_map::DimensionMap;
use crate::analysis::normalizer::{normalize, DimensionScore, RawDimension};
use crate::analysis::weights::EXPECTED_DIMENSIONS;

// ────────────────────────────────────────────────────────────────────────────
// Session model
// ────────────────────────────────────────────────────────────────────────────

/// One streamed dimension result. A missing `result` is treated as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct DimensionEvent {
    pub dimension: String,
    #[serde(default)]
    pub result: RawDimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    pub completed: usize,
    pub expected: usize,
    pub missing: Vec<String>,
    pub is_complete: bool,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub occupation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    dimensions: DimensionMap<RawDimension>,
}

impl AnalysisSession {
    pub fn new(occupation: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            occupation,
            created_at: now,
            updated_at: now,
            dimensions: DimensionMap::new(),
        }
    }

    /// Merges one dimension result and returns its normalized record.
    pub fn apply_event(&mut self, event: DimensionEvent) -> DimensionScore {
        let normalized = normalize(&event.result);
        if self
            .dimensions
            .insert(event.dimension.clone(), event.result)
            .is_some()
        {
            debug!(session_id = %self.id, dimension = %event.dimension, "Dimension result replaced");
        }
        self.updated_at = Utc::now();
        normalized
    }

    /// Completion against the expected dimension set. Extra dimensions are
    /// scored but never count toward completion.
    pub fn progress(&self) -> SessionProgress {
        let missing: Vec<String> = EXPECTED_DIMENSIONS
            .iter()
            .filter(|dimension| !self.dimensions.contains_key(dimension))
            .map(|dimension| dimension.to_string())
            .collect();
        let completed = EXPECTED_DIMENSIONS.len() - missing.len();

        SessionProgress {
            completed,
            expected: EXPECTED_DIMENSIONS.len(),
            is_complete: missing.is_empty(),
            missing,
        }
    }

    pub fn snapshot(&self) -> DimensionMap<RawDimension> {
        self.dimensions.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store trait
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Session limit of {limit} reached")]
    CapacityReached { limit: usize },
}

/// Result of applying one event, returned to the streaming caller.
#[derive(Debug, Clone, Serialize)]
pub struct EventOutcome {
    pub dimension: String,
    pub normalized: DimensionScore,
    pub progress: SessionProgress,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, occupation: Option<String>) -> Result<AnalysisSession, SessionError>;

    async fn apply_event(
        &self,
        id: Uuid,
        event: DimensionEvent,
    ) -> Result<EventOutcome, SessionError>;

    async fn get(&self, id: Uuid) -> Result<AnalysisSession, SessionError>;

    async fn remove(&self, id: Uuid) -> Result<(), SessionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// InMemorySessionStore — default backend
// ────────────────────────────────────────────────────────────────────────────

/// Sessions idle for longer than `idle_ttl` are evicted; abandoned streams
/// must not hold capacity forever.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AnalysisSession>>>,
    capacity: usize,
    idle_ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity,
            idle_ttl,
        }
    }

    fn is_expired(&self, session: &AnalysisSession, now: DateTime<Utc>) -> bool {
        now - session.updated_at > self.idle_ttl
    }

    fn prune_expired(&self, sessions: &mut HashMap<Uuid, AnalysisSession>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle analysis sessions");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, occupation: Option<String>) -> Result<AnalysisSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        self.prune_expired(&mut sessions);
        if sessions.len() >= self.capacity {
            return Err(SessionError::CapacityReached {
                limit: self.capacity,
            });
        }

        let session = AnalysisSession::new(occupation);
        sessions.insert(session.id, session.clone());
        info!(session_id = %session.id, active = sessions.len(), "Analysis session created");
        Ok(session)
    }

    async fn apply_event(
        &self,
        id: Uuid,
        event: DimensionEvent,
    ) -> Result<EventOutcome, SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&id)
            .is_some_and(|session| self.is_expired(session, Utc::now()))
        {
            sessions.remove(&id);
        }
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        let dimension = event.dimension.clone();
        let normalized = session.apply_event(event);
        let progress = session.progress();
        debug!(
            session_id = %id,
            dimension = %dimension,
            completed = progress.completed,
            "Dimension event applied"
        );

        Ok(EventOutcome {
            dimension,
            normalized,
            progress,
        })
    }

    async fn get(&self, id: Uuid) -> Result<AnalysisSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|session| !self.is_expired(session, Utc::now()))
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(session_id = %id, "Analysis session removed");
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
