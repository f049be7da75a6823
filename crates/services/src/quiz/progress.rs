use std::fmt;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Progress bar fill: the share of questions already answered, 100 once
    /// the quiz is finished.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 || self.is_complete {
            return 100.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}

/// Final tally of a quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: u32,
    pub wrong: u32,
    pub total: usize,
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.correct, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_tracks_answered_share() {
        let progress = QuizProgress {
            total: 4,
            answered: 1,
            remaining: 3,
            is_complete: false,
        };
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_is_full_when_complete() {
        let progress = QuizProgress {
            total: 3,
            answered: 3,
            remaining: 0,
            is_complete: true,
        };
        assert!((progress.percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_renders_final_tally() {
        let score = QuizScore {
            correct: 2,
            wrong: 1,
            total: 3,
        };
        assert_eq!(score.to_string(), "2 of 3");
    }
}
