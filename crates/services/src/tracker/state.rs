use chrono::{DateTime, Duration, Utc};
use url::Url;

use vocab_core::model::{SessionId, SessionWindow};

use crate::api::{SessionEndReport, SessionStartReport};

//
// ─── CONFIG ───────────────────────────────────────────────────────────────────
//

/// Quiescence window after which an open session is considered over.
#[must_use]
pub fn default_inactivity_window() -> Duration {
    Duration::seconds(30)
}

/// Tracker knobs: the page being tracked and the inactivity window.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub page_url: Url,
    pub inactivity_window: Duration,
}

impl TrackerConfig {
    #[must_use]
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            inactivity_window: default_inactivity_window(),
        }
    }

    #[must_use]
    pub fn with_inactivity_window(mut self, window: Duration) -> Self {
        self.inactivity_window = window;
        self
    }
}

//
// ─── TRACKER ──────────────────────────────────────────────────────────────────
//

/// Observable lifecycle stage of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No session open; the next activity opens one.
    Idle,
    /// A session is open and its inactivity deadline is armed.
    Open,
    /// A close report is in flight; further close attempts are no-ops.
    Closing,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Open {
        started_at: DateTime<Utc>,
        last_activity: DateTime<Utc>,
        session_id: Option<SessionId>,
    },
    Closing,
}

/// Pure session-tracking state machine.
///
/// Phases make the re-entrancy rules structural: a start report exists only
/// for the Idle→Open edge and an end report only for the Open→Closing edge,
/// so a burst of activity produces one start and a timer racing an unload
/// produces one end. All I/O stays with the caller.
#[derive(Debug)]
pub struct SessionTracker {
    config: TrackerConfig,
    state: State,
}

impl SessionTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        match self.state {
            State::Idle => TrackerPhase::Idle,
            State::Open { .. } => TrackerPhase::Open,
            State::Closing => TrackerPhase::Closing,
        }
    }

    /// Server identifier of the open session, once acknowledged.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        match self.state {
            State::Open { session_id, .. } => session_id,
            _ => None,
        }
    }

    /// When the inactivity timer should fire, while a session is open.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match self.state {
            State::Open { last_activity, .. } => {
                Some(last_activity + self.config.inactivity_window)
            }
            _ => None,
        }
    }

    /// True when the open session has outlived its inactivity window.
    #[must_use]
    pub fn close_due(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Register qualifying user activity.
    ///
    /// Returns the start report to dispatch when this activity opened a new
    /// session; activity inside an open session only refreshes the deadline.
    pub fn note_activity(&mut self, now: DateTime<Utc>) -> Option<SessionStartReport> {
        match self.state {
            State::Idle => {
                self.state = State::Open {
                    started_at: now,
                    last_activity: now,
                    session_id: None,
                };
                Some(SessionStartReport {
                    started_at: now,
                    page_url: self.config.page_url.clone(),
                })
            }
            State::Open {
                started_at,
                session_id,
                ..
            } => {
                self.state = State::Open {
                    started_at,
                    last_activity: now,
                    session_id,
                };
                None
            }
            // The old session is still being reported; nothing to reopen yet.
            State::Closing => None,
        }
    }

    /// Record the server's acknowledgement for the open session.
    ///
    /// A stale ack arriving after the session closed is dropped.
    pub fn attach_session_id(&mut self, id: SessionId) {
        if let State::Open { session_id, .. } = &mut self.state {
            *session_id = Some(id);
        }
    }

    /// Begin closing the open session.
    ///
    /// Returns the end report to dispatch; `None` when no session is open or
    /// a close is already in flight.
    pub fn begin_close(&mut self, now: DateTime<Utc>) -> Option<SessionEndReport> {
        let State::Open {
            started_at,
            session_id,
            ..
        } = self.state
        else {
            return None;
        };

        // A fixed clock can sit before started_at; clamp so the window is valid.
        let ended_at = now.max(started_at);
        let window = SessionWindow::close(started_at, ended_at).ok()?;

        self.state = State::Closing;
        Some(SessionEndReport { session_id, window })
    }

    /// Finish the close, whatever became of the report.
    pub fn finish_close(&mut self) {
        self.state = State::Idle;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
