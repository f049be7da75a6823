//! Shared error types for the services crate.

use thiserror::Error;

/// Errors surfaced by the remote learning API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    BadPayload(String),
}

/// Errors emitted by the quiz runner.
///
/// Re-entrancy violations (second click, advance outside feedback) come back
/// as `Err` values that callers drop; they are guards, not user-visible
/// failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available")]
    Empty,
    #[error("option index {0} is out of range")]
    OptionOutOfRange(usize),
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("no answer feedback is pending")]
    NoFeedbackPending,
    #[error("quiz already finished")]
    Finished,
}

/// Errors emitted by the flashcard review runner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("no card is currently shown")]
    NoCard,
}
