use std::fmt;

use vocab_core::model::{CategoryId, Question};

use crate::error::QuizError;

use super::progress::{QuizProgress, QuizScore};

//
// ─── ANSWER OUTCOME ───────────────────────────────────────────────────────────
//

/// What a single answer did, with everything a view needs to mark options.
///
/// `correct` is always the true option's index so the view can highlight it
/// even when the learner picked wrong; when the pick was right the two indices
/// coincide and marking is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub chosen: usize,
    pub correct: usize,
    pub is_correct: bool,
}

//
// ─── QUIZ ─────────────────────────────────────────────────────────────────────
//

/// Observable stage of the quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// A question is on screen awaiting exactly one click.
    Presenting,
    /// The answer is marked; an advance is pending.
    Feedback,
    /// All questions consumed; only a restart leaves this state.
    Finished,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Presenting,
    Feedback(AnswerOutcome),
    Finished,
}

/// In-memory run over a fixed question sequence.
///
/// Steps through the questions one at a time. The phase enum is the
/// re-entrancy guard: an answer is only accepted while `Presenting` and an
/// advance only while `Feedback`, so a second click or a stale feedback timer
/// cannot touch the counters.
pub struct QuizService {
    category: CategoryId,
    questions: Vec<Question>,
    current: usize,
    answered: usize,
    correct_count: u32,
    wrong_count: u32,
    phase: Phase,
}

impl QuizService {
    /// Create a run over the given questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if no questions are provided; an empty
    /// category must never reach `Presenting`.
    pub fn new(category: CategoryId, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            category,
            questions,
            current: 0,
            answered: 0,
            correct_count: 0,
            wrong_count: 0,
            phase: Phase::Presenting,
        })
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }

    /// Total number of questions in this run.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question currently presented or marked.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match self.phase {
            Phase::Presenting => QuizPhase::Presenting,
            Phase::Feedback(_) => QuizPhase::Feedback,
            Phase::Finished => QuizPhase::Finished,
        }
    }

    /// The outcome being shown, while in feedback.
    #[must_use]
    pub fn pending_feedback(&self) -> Option<AnswerOutcome> {
        match self.phase {
            Phase::Feedback(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The question on screen; during feedback this is still the answered one.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Returns a summary of the current quiz progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.total_questions(),
            answered: self.answered,
            remaining: self.total_questions().saturating_sub(self.answered),
            is_complete: self.is_finished(),
        }
    }

    /// The running tally.
    #[must_use]
    pub fn score(&self) -> QuizScore {
        QuizScore {
            correct: self.correct_count,
            wrong: self.wrong_count,
            total: self.total_questions(),
        }
    }

    /// Accept the single click for the current question.
    ///
    /// Increments exactly one counter and moves to feedback; the caller
    /// schedules the advance after its feedback delay.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyAnswered` for a repeated click,
    /// `QuizError::Finished` after the last question, and
    /// `QuizError::OptionOutOfRange` for an unknown option index.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome, QuizError> {
        match self.phase {
            Phase::Finished => Err(QuizError::Finished),
            Phase::Feedback(_) => Err(QuizError::AlreadyAnswered),
            Phase::Presenting => {
                let Some(question) = self.questions.get(self.current) else {
                    return Err(QuizError::Finished);
                };
                let option = question
                    .option(choice)
                    .ok_or(QuizError::OptionOutOfRange(choice))?;

                let outcome = AnswerOutcome {
                    chosen: choice,
                    correct: question.correct_index(),
                    is_correct: option.is_correct(),
                };

                if outcome.is_correct {
                    self.correct_count += 1;
                } else {
                    self.wrong_count += 1;
                }
                self.answered += 1;
                self.phase = Phase::Feedback(outcome);

                Ok(outcome)
            }
        }
    }

    /// Leave feedback for the next question, or finish the run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoFeedbackPending` outside feedback, which is how
    /// a stale feedback timer lands after a superseding load.
    pub fn advance(&mut self) -> Result<QuizPhase, QuizError> {
        if !matches!(self.phase, Phase::Feedback(_)) {
            return Err(QuizError::NoFeedbackPending);
        }

        self.current += 1;
        self.phase = if self.current >= self.questions.len() {
            Phase::Finished
        } else {
            Phase::Presenting
        };

        Ok(self.phase())
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("category", &self.category)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("correct_count", &self.correct_count)
            .field("wrong_count", &self.wrong_count)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::AnswerOption;

    fn question(prompt: &str, correct: usize) -> Question {
        let options = (0..4)
            .map(|i| AnswerOption::new(format!("t{i}"), i == correct))
            .collect();
        Question::new(prompt, options).unwrap()
    }

    fn quiz(corrects: &[usize]) -> QuizService {
        let questions = corrects
            .iter()
            .enumerate()
            .map(|(i, correct)| question(&format!("w{i}"), *correct))
            .collect();
        QuizService::new(CategoryId::new(1), questions).unwrap()
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = QuizService::new(CategoryId::new(1), Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn counts_match_answered_after_each_feedback() {
        let mut quiz = quiz(&[0, 1, 2]);

        quiz.answer(0).unwrap();
        assert_eq!(quiz.correct_count() + quiz.wrong_count(), 1);
        quiz.advance().unwrap();

        quiz.answer(0).unwrap();
        assert_eq!(quiz.correct_count() + quiz.wrong_count(), 2);
        quiz.advance().unwrap();

        quiz.answer(2).unwrap();
        assert_eq!(quiz.correct_count() + quiz.wrong_count(), 3);
    }

    #[test]
    fn second_click_is_rejected_without_counting() {
        let mut quiz = quiz(&[1]);

        quiz.answer(0).unwrap();
        let err = quiz.answer(1).unwrap_err();

        assert_eq!(err, QuizError::AlreadyAnswered);
        assert_eq!(quiz.correct_count(), 0);
        assert_eq!(quiz.wrong_count(), 1);
    }

    #[test]
    fn wrong_pick_still_reports_correct_index() {
        let mut quiz = quiz(&[2]);

        let outcome = quiz.answer(0).unwrap();

        assert!(!outcome.is_correct);
        assert_eq!(outcome.chosen, 0);
        assert_eq!(outcome.correct, 2);
    }

    #[test]
    fn matching_pick_marks_same_index() {
        let mut quiz = quiz(&[3]);

        let outcome = quiz.answer(3).unwrap();

        assert!(outcome.is_correct);
        assert_eq!(outcome.chosen, outcome.correct);
    }

    #[test]
    fn advance_outside_feedback_is_rejected() {
        let mut quiz = quiz(&[0, 0]);

        assert_eq!(quiz.advance().unwrap_err(), QuizError::NoFeedbackPending);

        quiz.answer(0).unwrap();
        quiz.advance().unwrap();
        assert_eq!(quiz.advance().unwrap_err(), QuizError::NoFeedbackPending);
    }

    #[test]
    fn run_finishes_after_last_advance() {
        let mut quiz = quiz(&[0, 1]);

        quiz.answer(0).unwrap();
        assert_eq!(quiz.advance().unwrap(), QuizPhase::Presenting);
        quiz.answer(0).unwrap();
        assert_eq!(quiz.advance().unwrap(), QuizPhase::Finished);

        assert!(quiz.is_finished());
        assert_eq!(quiz.answer(0).unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.score().to_string(), "1 of 2");
    }

    #[test]
    fn progress_reaches_full_on_finish() {
        let mut quiz = quiz(&[0]);
        assert_eq!(quiz.progress().remaining, 1);
        assert!(quiz.progress().percent() < 1.0);

        quiz.answer(0).unwrap();
        assert_eq!(quiz.progress().remaining, 0);
        quiz.advance().unwrap();

        let progress = quiz.progress();
        assert!(progress.is_complete);
        assert!((progress.percent() - 100.0).abs() < f64::EPSILON);
    }
}
