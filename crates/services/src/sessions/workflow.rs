use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{QuestionBank, SubmissionId};

use super::service::{QuizSession, Step};
use crate::error::SessionError;
use crate::gateway::SubmissionGateway;
use crate::wire::CAUSAL_LEVEL_FETCH_LIMIT;

/// Result of advancing a session, including the persistence outcome of the
/// final transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// The index now being answered, `None` once reviewing.
    pub next_index: Option<usize>,
    pub is_reviewing: bool,
    pub submission_id: Option<SubmissionId>,
    /// True when the peer fetch failed and review opened with an empty
    /// feed.
    pub peers_unavailable: bool,
}

/// Orchestrates session start and the final persistence round.
///
/// The session itself never talks to the gateway; this service performs
/// exactly one write (the full response list) and one read (the bounded
/// recent fetch) on the final transition, sequentially, and only then lets
/// the session reach `Reviewing`.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    gateway: Arc<dyn SubmissionGateway>,
    fetch_limit: u32,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            clock,
            gateway,
            fetch_limit: CAUSAL_LEVEL_FETCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_fetch_limit(mut self, limit: u32) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Start a new session over the given bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for an empty bank.
    pub fn start_session(&self, bank: Arc<QuestionBank>) -> Result<QuizSession, SessionError> {
        QuizSession::new(bank, self.clock.now())
    }

    /// Advance the session, persisting on the final question.
    ///
    /// Write failures propagate and leave the session on the last question
    /// with its draft intact, so the user can retry. A read failure after
    /// a successful write is logged and review opens with an empty peer
    /// feed rather than blocking the user from their own completion.
    ///
    /// # Errors
    ///
    /// Returns gate/state errors from the session, or
    /// `SessionError::Gateway` when the final write fails.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceOutcome, SessionError> {
        match session.advance()? {
            Step::Next(index) => Ok(AdvanceOutcome {
                next_index: Some(index),
                is_reviewing: false,
                submission_id: None,
                peers_unavailable: false,
            }),
            Step::AwaitingSubmission => {
                let id = self.gateway.submit(session.responses()).await?;
                let (peers, peers_unavailable) =
                    match self.gateway.fetch_recent(self.fetch_limit).await {
                        Ok(peers) => (peers, false),
                        Err(err) => {
                            tracing::warn!(
                                error = %err,
                                "peer fetch failed; opening review with an empty feed"
                            );
                            (Vec::new(), true)
                        }
                    };
                session.enter_review(id, peers, self.clock.now());
                Ok(AdvanceOutcome {
                    next_index: None,
                    is_reviewing: true,
                    submission_id: Some(id),
                    peers_unavailable,
                })
            }
        }
    }

    /// Clear the session back to the first question.
    pub fn restart(&self, session: &mut QuizSession) {
        session.restart(self.clock.now());
    }
}
