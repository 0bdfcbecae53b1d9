//! Superseding query session for one logical caller.
//!
//! Each `submit` takes a new generation number. Only the newest generation may
//! deliver results: an older call still in flight resolves to
//! `QueryOutcome::Superseded` as soon as a newer one is submitted (or the
//! session is cancelled), and a stale result that arrives late is discarded.
//!
//! Ranking itself is blocking (the remote client waits on the network), so it
//! runs on tokio's blocking pool under an explicit deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::engine::SymptomEngine;
use crate::error::{EngineError, PredictionFailure};
use crate::models::{MatchResult, SymptomContext};

/// What a submitted query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Completed(Vec<MatchResult>),
    /// A newer query (or a cancel) replaced this one before it finished.
    Superseded,
}

/// Cheap to clone; clones share the same generation counter.
#[derive(Clone)]
pub struct QuerySession {
    engine: Arc<SymptomEngine>,
    latest: Arc<watch::Sender<u64>>,
    deadline: Duration,
}

impl QuerySession {
    pub fn new(engine: Arc<SymptomEngine>, deadline: Duration) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            engine,
            latest: Arc::new(latest),
            deadline,
        }
    }

    /// Generation of the most recent submit or cancel.
    pub fn current_generation(&self) -> u64 {
        *self.latest.borrow()
    }

    /// True when no other handle to this session exists, so nothing can be
    /// in flight on it.
    pub(crate) fn is_idle(&self) -> bool {
        Arc::strong_count(&self.latest) == 1
    }

    /// Supersede whatever is in flight without starting anything new.
    pub fn cancel(&self) {
        let generation = self.advance();
        tracing::debug!(generation, "Query session cancelled");
    }

    /// Rank `symptoms`, superseding any earlier query from this session.
    pub async fn submit(
        &self,
        symptoms: Vec<String>,
        context: SymptomContext,
        k: Option<usize>,
    ) -> Result<QueryOutcome, EngineError> {
        let ticket = self.advance();
        let mut watcher = self.latest.subscribe();

        let engine = Arc::clone(&self.engine);
        let work = tokio::task::spawn_blocking(move || engine.rank(&symptoms, context, k));

        tokio::select! {
            joined = tokio::time::timeout(self.deadline, work) => {
                let result = match joined {
                    Err(_) => Err(EngineError::from(PredictionFailure::Timeout(self.deadline))),
                    Ok(Err(join_error)) => {
                        Err(EngineError::from(PredictionFailure::Worker(join_error.to_string())))
                    }
                    Ok(Ok(result)) => result,
                };

                if self.current_generation() != ticket {
                    tracing::debug!(ticket, "Discarding result of superseded query");
                    return Ok(QueryOutcome::Superseded);
                }
                result.map(QueryOutcome::Completed)
            }
            _ = superseded(&mut watcher, ticket) => {
                tracing::debug!(ticket, "Query superseded while in flight");
                Ok(QueryOutcome::Superseded)
            }
        }
    }

    fn advance(&self) -> u64 {
        let mut generation = 0;
        self.latest.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        generation
    }
}

/// Resolves once the session has moved past `ticket`.
async fn superseded(watcher: &mut watch::Receiver<u64>, ticket: u64) {
    loop {
        if *watcher.borrow_and_update() != ticket {
            return;
        }
        if watcher.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
