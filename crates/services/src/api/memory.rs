use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use vocab_core::model::{CategoryId, Question, ReviewCard, SessionId};

use crate::error::ApiError;

use super::{
    LearningApi, NextCard, ReviewMode, ReviewResultReport, SessionEndReport, SessionStartAck,
    SessionStartReport,
};

/// Scripted in-memory `LearningApi` for tests and offline runs.
///
/// Responses are queued up front; every request is recorded, including the
/// ones scripted to fail, so tests can assert exactly which reports were
/// dispatched.
#[derive(Clone, Default)]
pub struct InMemoryLearningApi {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    last_session_id: u64,
    questions: HashMap<CategoryId, Vec<Question>>,
    cards: VecDeque<ReviewCard>,
    fail_tracking: bool,
    fail_quiz: bool,
    fail_results: bool,
    started: Vec<SessionStartReport>,
    ended: Vec<SessionEndReport>,
    results: Vec<(ReviewMode, ReviewResultReport)>,
    quiz_requests: Vec<CategoryId>,
}

impl InMemoryLearningApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|e| ApiError::BadPayload(format!("lock poisoned: {e}")))
    }

    fn lock_for_script(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Script the question set served for `category`.
    pub fn insert_questions(&self, category: CategoryId, questions: Vec<Question>) {
        self.lock_for_script().questions.insert(category, questions);
    }

    /// Queue a flashcard; cards are served in insertion order, then the flow
    /// reports exhausted.
    pub fn push_card(&self, card: ReviewCard) {
        self.lock_for_script().cards.push_back(card);
    }

    /// Make session tracking requests fail with a server error.
    pub fn fail_tracking(&self, fail: bool) {
        self.lock_for_script().fail_tracking = fail;
    }

    /// Make quiz question requests fail with a server error.
    pub fn fail_quiz(&self, fail: bool) {
        self.lock_for_script().fail_quiz = fail;
    }

    /// Make review result posts fail with a server error.
    pub fn fail_results(&self, fail: bool) {
        self.lock_for_script().fail_results = fail;
    }

    /// Session start reports dispatched so far, including failed attempts.
    #[must_use]
    pub fn started_reports(&self) -> Vec<SessionStartReport> {
        self.lock_for_script().started.clone()
    }

    /// Session end reports dispatched so far, including failed attempts.
    #[must_use]
    pub fn ended_reports(&self) -> Vec<SessionEndReport> {
        self.lock_for_script().ended.clone()
    }

    /// Review results dispatched so far, with the flow they belong to.
    #[must_use]
    pub fn review_results(&self) -> Vec<(ReviewMode, ReviewResultReport)> {
        self.lock_for_script().results.clone()
    }

    /// Number of quiz question fetches served or failed.
    #[must_use]
    pub fn quiz_request_count(&self) -> usize {
        self.lock_for_script().quiz_requests.len()
    }
}

fn server_error() -> ApiError {
    ApiError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)
}

#[async_trait]
impl LearningApi for InMemoryLearningApi {
    async fn start_session(
        &self,
        report: SessionStartReport,
    ) -> Result<SessionStartAck, ApiError> {
        let mut guard = self.lock()?;
        guard.started.push(report);
        if guard.fail_tracking {
            return Err(server_error());
        }
        guard.last_session_id += 1;
        Ok(SessionStartAck {
            session_id: SessionId::new(guard.last_session_id),
        })
    }

    async fn end_session(&self, report: SessionEndReport) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        guard.ended.push(report);
        if guard.fail_tracking {
            return Err(server_error());
        }
        Ok(())
    }

    async fn quiz_questions(&self, category: CategoryId) -> Result<Vec<Question>, ApiError> {
        let mut guard = self.lock()?;
        guard.quiz_requests.push(category);
        if guard.fail_quiz {
            return Err(server_error());
        }
        Ok(guard.questions.get(&category).cloned().unwrap_or_default())
    }

    async fn next_review_card(&self, _mode: ReviewMode) -> Result<NextCard, ApiError> {
        let mut guard = self.lock()?;
        Ok(match guard.cards.pop_front() {
            Some(card) => NextCard::Card(card),
            None => NextCard::Exhausted,
        })
    }

    async fn send_review_result(
        &self,
        mode: ReviewMode,
        report: ReviewResultReport,
    ) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        guard.results.push((mode, report));
        if guard.fail_results {
            return Err(server_error());
        }
        Ok(())
    }
}
