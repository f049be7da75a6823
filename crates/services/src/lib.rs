#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod quiz;
pub mod review;
pub mod tracker;

pub use vocab_core::Clock;

pub use error::{ApiError, QuizError, ReviewError};

pub use api::{
    ApiConfig, HttpLearningApi, InMemoryLearningApi, LearningApi, NextCard, ReviewMode,
    ReviewResultReport, SessionEndReport, SessionStartAck, SessionStartReport,
};
pub use quiz::{
    AnswerOutcome, LoadOutcome, LoadTicket, QuizController, QuizPhase, QuizProgress, QuizScore,
    QuizScreen, QuizService, QuizTiming,
};
pub use review::{ReviewRunner, ReviewScreen};
pub use tracker::{
    CloseTrigger, SessionTracker, SessionTrackerService, TrackerConfig, TrackerPhase,
};
