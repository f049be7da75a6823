//! Remote learning API boundary.
//!
//! The runners and the session tracker talk to the server through the
//! [`LearningApi`] port; `HttpLearningApi` is the production adapter and
//! `InMemoryLearningApi` a scripted one for tests and offline use.

mod http;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use vocab_core::model::{CategoryId, Judgment, Question, ReviewCard, SessionId, SessionWindow, WordId};

use crate::error::ApiError;

pub use http::{ApiConfig, HttpLearningApi};
pub use memory::InMemoryLearningApi;

//
// ─── REPORTS ──────────────────────────────────────────────────────────────────
//

/// Which flashcard flow a request belongs to.
///
/// The server keeps separate endpoints for first-time words and spaced
/// repetition; the runner is otherwise identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    NewWords,
    Repetition,
}

/// Payload announcing an opened learning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStartReport {
    pub started_at: DateTime<Utc>,
    pub page_url: Url,
}

/// Server acknowledgement for a session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStartAck {
    pub session_id: SessionId,
}

/// Payload closing a learning session.
///
/// `session_id` is absent when the start report failed or its acknowledgement
/// never arrived; the close is still sent so the engagement window is not
/// lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEndReport {
    pub session_id: Option<SessionId>,
    pub window: SessionWindow,
}

/// A known/forgotten verdict for one reviewed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewResultReport {
    pub card_id: WordId,
    pub judgment: Judgment,
    pub session_id: Option<SessionId>,
}

/// Outcome of asking for the next flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextCard {
    Card(ReviewCard),
    /// The server has nothing left to show for this flow.
    Exhausted,
}

//
// ─── PORT ─────────────────────────────────────────────────────────────────────
//

/// Client-side contract for the vocabulary server.
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// Report a freshly opened session and obtain its server identifier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the acknowledgement is
    /// malformed.
    async fn start_session(&self, report: SessionStartReport)
    -> Result<SessionStartAck, ApiError>;

    /// Report a closed session. Best-effort; the ack body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    async fn end_session(&self, report: SessionEndReport) -> Result<(), ApiError>;

    /// Fetch the fixed question sequence for a category.
    ///
    /// An empty list is a valid response; the caller decides how to render it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or a question violates the
    /// one-correct-option invariant.
    async fn quiz_questions(&self, category: CategoryId) -> Result<Vec<Question>, ApiError>;

    /// Fetch the next flashcard for the given flow.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or a success payload is
    /// missing card fields.
    async fn next_review_card(&self, mode: ReviewMode) -> Result<NextCard, ApiError>;

    /// Report a judgment for one card.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails.
    async fn send_review_result(
        &self,
        mode: ReviewMode,
        report: ReviewResultReport,
    ) -> Result<(), ApiError>;
}
