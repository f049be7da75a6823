use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use vocab_core::model::{CategoryId, Question};

use crate::api::LearningApi;
use crate::error::{ApiError, QuizError};

use super::service::QuizService;

//
// ─── TIMING ───────────────────────────────────────────────────────────────────
//

/// Pacing for the feedback auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizTiming {
    pub feedback_delay: Duration,
}

impl Default for QuizTiming {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(1200),
        }
    }
}

impl QuizTiming {
    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }
}

//
// ─── SCREEN ───────────────────────────────────────────────────────────────────
//

/// What the quiz area is showing.
///
/// `NoQuestions` and `LoadFailed` are terminal message screens; only an
/// explicit reload leaves them.
pub enum QuizScreen {
    Loading,
    Ready(QuizService),
    NoQuestions,
    LoadFailed,
}

impl fmt::Debug for QuizScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizScreen::Loading => write!(f, "Loading"),
            QuizScreen::Ready(quiz) => f.debug_tuple("Ready").field(quiz).finish(),
            QuizScreen::NoQuestions => write!(f, "NoQuestions"),
            QuizScreen::LoadFailed => write!(f, "LoadFailed"),
        }
    }
}

/// Claim on a single load request. Only the ticket from the most recent
/// `begin_load` can still mutate the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    category: CategoryId,
}

impl LoadTicket {
    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }
}

/// How a finished load request was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Questions arrived and a fresh run is presenting.
    Applied,
    /// The category has no questions; terminal message screen.
    NoQuestions,
    /// The fetch failed; terminal message screen.
    Failed,
    /// A newer load superseded this one; nothing changed.
    Stale,
}

//
// ─── CONTROLLER ───────────────────────────────────────────────────────────────
//

/// Owns the quiz screen and applies the latest-load-wins rule.
///
/// Loads are claimed with a ticket before the request goes out; a response
/// whose ticket generation is no longer current is discarded, so a slow
/// response can never clobber a newer run.
pub struct QuizController {
    api: Arc<dyn LearningApi>,
    timing: QuizTiming,
    screen: QuizScreen,
    generation: u64,
}

impl QuizController {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self {
            api,
            timing: QuizTiming::default(),
            screen: QuizScreen::Loading,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: QuizTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn timing(&self) -> QuizTiming {
        self.timing
    }

    #[must_use]
    pub fn screen(&self) -> &QuizScreen {
        &self.screen
    }

    /// The active run, when one is on screen.
    #[must_use]
    pub fn quiz(&self) -> Option<&QuizService> {
        match &self.screen {
            QuizScreen::Ready(quiz) => Some(quiz),
            _ => None,
        }
    }

    /// Mutable access to the active run for answering and advancing.
    #[must_use]
    pub fn quiz_mut(&mut self) -> Option<&mut QuizService> {
        match &mut self.screen {
            QuizScreen::Ready(quiz) => Some(quiz),
            _ => None,
        }
    }

    /// Claim a new load. Any response still in flight for an earlier claim
    /// becomes stale, and the screen shows loading.
    pub fn begin_load(&mut self, category: CategoryId) -> LoadTicket {
        self.generation += 1;
        self.screen = QuizScreen::Loading;
        LoadTicket {
            generation: self.generation,
            category,
        }
    }

    /// Apply a finished load request.
    ///
    /// Stale tickets are dropped without touching the screen; failures and
    /// empty categories land on their terminal message screens.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, ApiError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                category = %ticket.category,
                "discarding stale quiz load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(questions) => match QuizService::new(ticket.category, questions) {
                Ok(quiz) => {
                    self.screen = QuizScreen::Ready(quiz);
                    LoadOutcome::Applied
                }
                Err(QuizError::Empty) => {
                    self.screen = QuizScreen::NoQuestions;
                    LoadOutcome::NoQuestions
                }
                Err(_) => {
                    self.screen = QuizScreen::LoadFailed;
                    LoadOutcome::Failed
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, category = %ticket.category, "quiz load failed");
                self.screen = QuizScreen::LoadFailed;
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch and apply the question set for `category`.
    ///
    /// Also the restart path: a fresh run replaces the finished one with
    /// counters at zero, and exactly one request goes out.
    pub async fn reload(&mut self, category: CategoryId) -> LoadOutcome {
        let ticket = self.begin_load(category);
        let result = self.api.quiz_questions(category).await;
        self.apply_load(ticket, result)
    }
}
