//! Shared types for the HTTP API layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::engine::SymptomEngine;
use crate::session::QuerySession;

use super::error::ApiError;

/// Upper bound on tracked client sessions before idle ones are evicted.
pub const MAX_CLIENT_SESSIONS: usize = 4096;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<SymptomEngine>,
    pub sessions: Arc<Mutex<SessionRegistry>>,
    /// Deadline applied to every ranking request.
    pub request_timeout: Duration,
    /// Identifies this API instance; changes on every restart.
    pub session_id: String,
    /// RFC 3339 time the instance was created.
    pub started_at: String,
}

impl ApiContext {
    pub fn new(engine: Arc<SymptomEngine>, request_timeout: Duration) -> Self {
        Self {
            engine,
            sessions: Arc::new(Mutex::new(SessionRegistry::new())),
            request_timeout,
            session_id: Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The session a request should run in.
    ///
    /// Requests naming a `client_id` share that client's session; anonymous
    /// requests get a fresh one and can never be superseded.
    pub fn session_for(&self, client_id: Option<&str>) -> Result<QuerySession, ApiError> {
        match client_id {
            None => Ok(QuerySession::new(
                Arc::clone(&self.engine),
                self.request_timeout,
            )),
            Some(id) => {
                let mut sessions = self
                    .sessions
                    .lock()
                    .map_err(|_| ApiError::Internal("session registry lock poisoned".into()))?;
                Ok(sessions.get_or_create(id, || {
                    QuerySession::new(Arc::clone(&self.engine), self.request_timeout)
                }))
            }
        }
    }

    /// Cancel a client's in-flight query, if it has one.
    pub fn cancel_session(&self, client_id: &str) -> Result<bool, ApiError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".into()))?;
        Ok(sessions.cancel(client_id))
    }
}

// ═══════════════════════════════════════════════════════════
// Session registry
// ═══════════════════════════════════════════════════════════

/// Per-client query sessions, keyed by caller-chosen `client_id`.
pub struct SessionRegistry {
    sessions: HashMap<String, QuerySession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Existing session for `client_id`, or a new one from `make`.
    ///
    /// At capacity idle sessions are evicted first. If every tracked session
    /// is busy, they are all cancelled before being dropped, so an evicted
    /// client's in-flight call resolves to `Superseded` instead of racing a
    /// call made through its replacement session.
    pub fn get_or_create<F>(&mut self, client_id: &str, make: F) -> QuerySession
    where
        F: FnOnce() -> QuerySession,
    {
        if let Some(session) = self.sessions.get(client_id) {
            return session.clone();
        }
        if self.sessions.len() >= MAX_CLIENT_SESSIONS {
            self.evict();
        }
        let session = make();
        self.sessions.insert(client_id.to_string(), session.clone());
        session
    }

    fn evict(&mut self) {
        let tracked = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_idle());
        if self.sessions.len() >= MAX_CLIENT_SESSIONS {
            tracing::warn!(
                busy = self.sessions.len(),
                "Client session registry full of busy sessions, cancelling all"
            );
            for session in self.sessions.values() {
                session.cancel();
            }
            self.sessions.clear();
        }
        tracing::info!(
            evicted = tracked - self.sessions.len(),
            kept = self.sessions.len(),
            "Client session registry full, evicted sessions"
        );
    }

    pub fn cancel(&self, client_id: &str) -> bool {
        match self.sessions.get(client_id) {
            Some(session) => {
                session.cancel();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
