mod progress;
mod service;
mod workflow;

// Public API of the quiz subsystem.
pub use progress::{QuizProgress, QuizScore};
pub use service::{AnswerOutcome, QuizPhase, QuizService};
pub use workflow::{LoadOutcome, LoadTicket, QuizController, QuizScreen, QuizTiming};
