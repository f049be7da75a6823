use thiserror::Error;

use crate::model::ids::WordId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building a review card.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("card word is empty")]
    EmptyWord,

    #[error("card translation is empty")]
    EmptyTranslation,
}

//
// ─── JUDGMENT ─────────────────────────────────────────────────────────────────
//

/// The learner's verdict on a single flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    /// The learner recognized the word.
    Known,
    /// The learner did not recall the word.
    Forgotten,
}

impl Judgment {
    /// Maps the wire-level boolean onto a judgment.
    #[must_use]
    pub fn from_known(known: bool) -> Self {
        if known { Self::Known } else { Self::Forgotten }
    }

    /// The wire-level boolean the server expects.
    #[must_use]
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known)
    }
}

//
// ─── REVIEW CARD ──────────────────────────────────────────────────────────────
//

/// A single flashcard: the word to recall plus its hidden answer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    id: WordId,
    word: String,
    translation: String,
    transcription: Option<String>,
}

impl ReviewCard {
    /// Build a card, rejecting blank word or translation.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyWord` or `CardError::EmptyTranslation` when the
    /// respective field is blank.
    pub fn new(
        id: WordId,
        word: impl Into<String>,
        translation: impl Into<String>,
        transcription: Option<String>,
    ) -> Result<Self, CardError> {
        let word = word.into();
        if word.trim().is_empty() {
            return Err(CardError::EmptyWord);
        }
        let translation = translation.into();
        if translation.trim().is_empty() {
            return Err(CardError::EmptyTranslation);
        }

        Ok(Self {
            id,
            word,
            translation,
            transcription: transcription.filter(|t| !t.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn transcription(&self) -> Option<&str> {
        self.transcription.as_deref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_keeps_fields() {
        let card = ReviewCard::new(
            WordId::new(3),
            "cat",
            "кіт",
            Some("kæt".to_string()),
        )
        .unwrap();

        assert_eq!(card.id(), WordId::new(3));
        assert_eq!(card.word(), "cat");
        assert_eq!(card.translation(), "кіт");
        assert_eq!(card.transcription(), Some("kæt"));
    }

    #[test]
    fn blank_transcription_is_dropped() {
        let card = ReviewCard::new(WordId::new(1), "dog", "пес", Some("  ".to_string())).unwrap();
        assert_eq!(card.transcription(), None);
    }

    #[test]
    fn empty_word_is_rejected() {
        let err = ReviewCard::new(WordId::new(1), "", "пес", None).unwrap_err();
        assert_eq!(err, CardError::EmptyWord);
    }

    #[test]
    fn empty_translation_is_rejected() {
        let err = ReviewCard::new(WordId::new(1), "dog", " ", None).unwrap_err();
        assert_eq!(err, CardError::EmptyTranslation);
    }

    #[test]
    fn judgment_maps_to_wire_boolean() {
        assert!(Judgment::Known.is_known());
        assert!(!Judgment::Forgotten.is_known());
        assert_eq!(Judgment::from_known(true), Judgment::Known);
        assert_eq!(Judgment::from_known(false), Judgment::Forgotten);
    }
}
