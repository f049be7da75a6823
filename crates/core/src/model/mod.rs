mod card;
mod ids;
mod question;
mod session;

pub use ids::{CategoryId, SessionId, WordId};

pub use card::{CardError, Judgment, ReviewCard};
pub use question::{AnswerOption, Question, QuestionError};
pub use session::{ActivityKind, SessionWindow, SessionWindowError};
