use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a multiple-choice question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question has no answer options")]
    NoOptions,

    #[error("question has no correct option")]
    NoCorrectOption,

    #[error("question has {0} correct options, expected exactly one")]
    MultipleCorrectOptions(usize),
}

//
// ─── ANSWER OPTION ────────────────────────────────────────────────────────────
//

/// A single clickable answer for a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    label: String,
    is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(label: impl Into<String>, is_correct: bool) -> Self {
        Self {
            label: label.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct option.
///
/// Options keep the order they arrived in; the server shuffles them before
/// delivery, so the client never reorders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<AnswerOption>,
    correct_index: usize,
}

impl Question {
    /// Build a question, validating the one-correct-option invariant.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::NoOptions` for an empty option list, and
    /// `QuestionError::NoCorrectOption` / `QuestionError::MultipleCorrectOptions`
    /// when the correct-option count is not exactly one.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let correct: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.is_correct())
            .map(|(index, _)| index)
            .collect();

        let correct_index = match correct.as_slice() {
            [] => return Err(QuestionError::NoCorrectOption),
            [index] => *index,
            many => return Err(QuestionError::MultipleCorrectOptions(many.len())),
        };

        Ok(Self {
            prompt,
            options,
            correct_index,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Number of answer options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Index of the single correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Returns the option at `index`, if any.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(correct: usize, len: usize) -> Vec<AnswerOption> {
        (0..len)
            .map(|i| AnswerOption::new(format!("option {i}"), i == correct))
            .collect()
    }

    #[test]
    fn question_records_correct_index() {
        let q = Question::new("cat", options(2, 4)).unwrap();
        assert_eq!(q.correct_index(), 2);
        assert_eq!(q.option_count(), 4);
        assert!(q.option(2).unwrap().is_correct());
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = Question::new("  ", options(0, 2)).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn no_options_is_rejected() {
        let err = Question::new("cat", Vec::new()).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn missing_correct_option_is_rejected() {
        let opts = vec![
            AnswerOption::new("a", false),
            AnswerOption::new("b", false),
        ];
        let err = Question::new("cat", opts).unwrap_err();
        assert_eq!(err, QuestionError::NoCorrectOption);
    }

    #[test]
    fn multiple_correct_options_are_rejected() {
        let opts = vec![
            AnswerOption::new("a", true),
            AnswerOption::new("b", true),
            AnswerOption::new("c", false),
        ];
        let err = Question::new("cat", opts).unwrap_err();
        assert_eq!(err, QuestionError::MultipleCorrectOptions(2));
    }
}
