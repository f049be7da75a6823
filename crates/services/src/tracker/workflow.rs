use std::sync::Arc;

use chrono::{DateTime, Utc};
use vocab_core::Clock;
use vocab_core::model::{ActivityKind, SessionId};

use crate::api::LearningApi;

use super::state::{SessionTracker, TrackerConfig, TrackerPhase};

/// What forced a session to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Inactivity,
    PageHide,
    PageUnload,
}

/// Orchestrates the tracker machine against the remote API.
///
/// Every report failure is swallowed after a log line; tracking must never
/// disturb the flow it observes, and local state always resets so the next
/// activity burst can open a fresh session.
pub struct SessionTrackerService {
    clock: Clock,
    api: Arc<dyn LearningApi>,
    tracker: SessionTracker,
}

impl SessionTrackerService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn LearningApi>, config: TrackerConfig) -> Self {
        Self {
            clock,
            api,
            tracker: SessionTracker::new(config),
        }
    }

    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.tracker.phase()
    }

    /// Identifier of the open session, for correlating review results.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.tracker.session_id()
    }

    /// When the inactivity timer should next fire.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.tracker.deadline()
    }

    #[must_use]
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Handle a qualifying input event, opening a session when none is.
    pub async fn record_activity(&mut self, kind: ActivityKind) {
        let now = self.clock.now();
        let Some(report) = self.tracker.note_activity(now) else {
            return;
        };

        tracing::debug!(?kind, started_at = %report.started_at, "session opened");
        match self.api.start_session(report).await {
            Ok(ack) => self.tracker.attach_session_id(ack.session_id),
            Err(err) => tracing::warn!(error = %err, "session start report failed"),
        }
    }

    /// Handle inactivity-timer expiry.
    ///
    /// Re-checks the deadline against the clock: activity that slipped in
    /// after the timer was armed keeps the session open.
    pub async fn deadline_elapsed(&mut self) {
        if !self.tracker.close_due(self.clock.now()) {
            return;
        }
        self.close(CloseTrigger::Inactivity).await;
    }

    /// Handle the page becoming hidden.
    pub async fn page_hidden(&mut self) {
        self.close(CloseTrigger::PageHide).await;
    }

    /// Handle page teardown.
    pub async fn page_unloading(&mut self) {
        self.close(CloseTrigger::PageUnload).await;
    }

    async fn close(&mut self, trigger: CloseTrigger) {
        let now = self.clock.now();
        let Some(report) = self.tracker.begin_close(now) else {
            return;
        };

        tracing::debug!(
            ?trigger,
            duration = report.window.duration_seconds(),
            "session closing"
        );
        if let Err(err) = self.api.end_session(report).await {
            tracing::warn!(error = %err, ?trigger, "session end report failed");
        }
        self.tracker.finish_close();
    }
}
