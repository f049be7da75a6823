use std::sync::Arc;

use vocab_core::model::{Judgment, ReviewCard, SessionId};

use crate::api::{LearningApi, NextCard, ReviewMode, ReviewResultReport};
use crate::error::ReviewError;

//
// ─── SCREEN ───────────────────────────────────────────────────────────────────
//

/// What the flashcard area is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewScreen {
    Loading,
    Card {
        card: ReviewCard,
        /// Whether translation and transcription are disclosed.
        revealed: bool,
    },
    /// The server has no more cards for this flow; terminal.
    Exhausted,
    /// The card fetch failed; terminal message screen.
    LoadFailed,
}

//
// ─── RUNNER ───────────────────────────────────────────────────────────────────
//

/// Single-card-at-a-time recall flow.
///
/// Fetches one card, takes one known/forgotten judgment, reports it, and
/// fetches the next. Judging puts the screen back on `Loading` before any I/O,
/// so a double click has no card to act on.
pub struct ReviewRunner {
    api: Arc<dyn LearningApi>,
    mode: ReviewMode,
    screen: ReviewScreen,
}

impl ReviewRunner {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>, mode: ReviewMode) -> Self {
        Self {
            api,
            mode,
            screen: ReviewScreen::Loading,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    #[must_use]
    pub fn screen(&self) -> &ReviewScreen {
        &self.screen
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&ReviewCard> {
        match &self.screen {
            ReviewScreen::Card { card, .. } => Some(card),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        matches!(self.screen, ReviewScreen::Card { revealed: true, .. })
    }

    // First-time words show their translation immediately; the repetition
    // flow hides it until the learner asks.
    fn starts_revealed(&self) -> bool {
        self.mode == ReviewMode::NewWords
    }

    /// Fetch the next card for this flow.
    pub async fn load_next(&mut self) {
        self.screen = ReviewScreen::Loading;
        self.screen = match self.api.next_review_card(self.mode).await {
            Ok(NextCard::Card(card)) => ReviewScreen::Card {
                card,
                revealed: self.starts_revealed(),
            },
            Ok(NextCard::Exhausted) => ReviewScreen::Exhausted,
            Err(err) => {
                tracing::warn!(error = %err, mode = ?self.mode, "card load failed");
                ReviewScreen::LoadFailed
            }
        };
    }

    /// Disclose the hidden translation/transcription of the current card.
    ///
    /// No state transition happens; revealing is display only.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NoCard` when no card is on screen.
    pub fn reveal(&mut self) -> Result<(), ReviewError> {
        match &mut self.screen {
            ReviewScreen::Card { revealed, .. } => {
                *revealed = true;
                Ok(())
            }
            _ => Err(ReviewError::NoCard),
        }
    }

    /// Record the learner's verdict on the current card and move on.
    ///
    /// The result report carries the open session's identifier when the
    /// tracker has one. A failed report is logged and swallowed; the flow
    /// continues to the next card either way.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NoCard` when no card is on screen.
    pub async fn judge(
        &mut self,
        judgment: Judgment,
        session_id: Option<SessionId>,
    ) -> Result<(), ReviewError> {
        let ReviewScreen::Card { card, .. } = &self.screen else {
            return Err(ReviewError::NoCard);
        };

        let report = ReviewResultReport {
            card_id: card.id(),
            judgment,
            session_id,
        };

        self.screen = ReviewScreen::Loading;
        if let Err(err) = self.api.send_review_result(self.mode, report).await {
            tracing::warn!(error = %err, card = %report.card_id, "review result report failed");
        }

        self.load_next().await;
        Ok(())
    }
}
