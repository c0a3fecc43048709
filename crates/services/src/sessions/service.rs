use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use quiz_core::evaluate;
use quiz_core::model::{
    Question, QuestionBank, QuestionResponse, ResponseDraft, Submission, SubmissionId,
};

use super::progress::SessionProgress;
use super::view::ReviewFeed;
use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Answering the question at this index.
    Answering(usize),
    /// Terminal for the session; peer data is loaded. Only `restart`
    /// leaves this state.
    Reviewing,
}

/// Result of a successful forward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the next question.
    Next(usize),
    /// The final response is committed; persistence must confirm before
    /// the session may reach `Reviewing`.
    AwaitingSubmission,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session for one user.
///
/// An explicit, passed-in context object; no ambient globals, so a
/// server-rendered deployment can hold many sessions side by side. Owns
/// the draft, the committed response list, and the review cache. All
/// transitions are gate-checked here; persistence happens in
/// `QuizLoopService`, the only caller of `enter_review`.
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    current: usize,
    draft: ResponseDraft,
    responses: Vec<QuestionResponse>,
    reviewing: bool,
    peer_feed: ReviewFeed,
    submission_id: Option<SubmissionId>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a new session over the given bank, starting at question 0.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the bank holds no questions.
    pub fn new(bank: Arc<QuestionBank>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if bank.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            bank,
            current: 0,
            draft: ResponseDraft::new(),
            responses: Vec::new(),
            reviewing: false,
            peer_feed: ReviewFeed::default(),
            submission_id: None,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.reviewing {
            SessionState::Reviewing
        } else {
            SessionState::Answering(self.current)
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question being answered, or `None` once reviewing.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.reviewing {
            None
        } else {
            self.bank.question(self.current)
        }
    }

    #[must_use]
    pub fn draft(&self) -> &ResponseDraft {
        &self.draft
    }

    #[must_use]
    pub fn responses(&self) -> &[QuestionResponse] {
        &self.responses
    }

    #[must_use]
    pub fn peer_feed(&self) -> &ReviewFeed {
        &self.peer_feed
    }

    #[must_use]
    pub fn submission_id(&self) -> Option<SubmissionId> {
        self.submission_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.bank.len(),
            answered: self.responses.len(),
            current: self.current,
            is_reviewing: self.reviewing,
        }
    }

    /// Record the chosen option in the draft. Does not change state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyReviewing` once reviewing, or
    /// `SessionError::UnknownOption` for a key the bank does not offer.
    pub fn select_option(&mut self, key: &str) -> Result<(), SessionError> {
        self.ensure_answering()?;
        if !self.bank.has_option(key) {
            return Err(SessionError::UnknownOption {
                key: key.to_owned(),
            });
        }
        self.draft.select(key);
        Ok(())
    }

    /// Replace the draft reasoning. Does not change state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyReviewing` once reviewing.
    pub fn edit_reasoning(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_answering()?;
        self.draft.set_reasoning(text);
        Ok(())
    }

    /// Commit the current draft and move forward.
    ///
    /// On a non-final question the draft is cleared and the session moves
    /// to the next index. On the final question the response is committed
    /// (replace-by-index) but the draft is retained and the state stays on
    /// the last question, so a failed persistence round can be retried;
    /// only `enter_review` completes the transition.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::GateNotMet` when the draft does not hold the
    /// correct option with enough reasoning; the session is unchanged.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        self.ensure_answering()?;
        let Some(question) = self.bank.question(self.current) else {
            return Err(SessionError::AlreadyReviewing);
        };
        if !evaluate::meets_answer_gate(question, &self.draft) {
            return Err(SessionError::GateNotMet {
                index: self.current,
            });
        }

        let response = QuestionResponse::new(self.current, question.clone(), &self.draft)
            .map_err(|_| SessionError::GateNotMet {
                index: self.current,
            })?;
        self.commit(response);

        if self.current + 1 < self.bank.len() {
            self.current += 1;
            self.draft.clear();
            Ok(Step::Next(self.current))
        } else {
            Ok(Step::AwaitingSubmission)
        }
    }

    /// Move back one question without touching committed responses.
    ///
    /// The draft is cleared; previously committed answers are not re-shown
    /// on return.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtStart` at question 0 and
    /// `SessionError::AlreadyReviewing` once reviewing.
    pub fn retreat(&mut self) -> Result<usize, SessionError> {
        self.ensure_answering()?;
        if self.current == 0 {
            return Err(SessionError::AtStart);
        }
        self.current -= 1;
        self.draft.clear();
        Ok(self.current)
    }

    /// Clear all state and return to the first question. Valid from any
    /// state.
    pub fn restart(&mut self, started_at: DateTime<Utc>) {
        self.current = 0;
        self.draft.clear();
        self.responses.clear();
        self.reviewing = false;
        self.peer_feed = ReviewFeed::default();
        self.submission_id = None;
        self.started_at = started_at;
        self.completed_at = None;
    }

    /// Complete the transition to `Reviewing` after persistence confirmed.
    pub(crate) fn enter_review(
        &mut self,
        id: SubmissionId,
        peers: Vec<Submission>,
        completed_at: DateTime<Utc>,
    ) {
        self.submission_id = Some(id);
        self.peer_feed = ReviewFeed::new(peers);
        self.reviewing = true;
        self.completed_at = Some(completed_at);
        self.draft.clear();
    }

    // replace-by-index, never append-duplicate
    fn commit(&mut self, response: QuestionResponse) {
        match self
            .responses
            .iter_mut()
            .find(|existing| existing.question_index() == response.question_index())
        {
            Some(existing) => *existing = response,
            None => self.responses.push(response),
        }
    }

    fn ensure_answering(&self) -> Result<(), SessionError> {
        if self.reviewing {
            return Err(SessionError::AlreadyReviewing);
        }
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.bank.len())
            .field("current", &self.current)
            .field("responses_len", &self.responses.len())
            .field("reviewing", &self.reviewing)
            .field("submission_id", &self.submission_id)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
