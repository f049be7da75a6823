use chrono::{DateTime, Utc};
use thiserror::Error;

//
// ─── ACTIVITY ─────────────────────────────────────────────────────────────────
//

/// Input events that count as user engagement.
///
/// Any of these keeps a learning session alive; they are never distinguished
/// beyond logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerMove,
    Scroll,
    Click,
    KeyPress,
    TouchStart,
}

//
// ─── SESSION WINDOW ───────────────────────────────────────────────────────────
//

/// Errors that can occur while closing a session window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionWindowError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,
}

/// A closed window of contiguous user engagement.
///
/// Duration is floored to whole seconds, matching what the tracking endpoint
/// stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    duration_seconds: u64,
}

impl SessionWindow {
    /// Close a window over `[started_at, ended_at]`.
    ///
    /// # Errors
    ///
    /// Returns `SessionWindowError::InvalidTimeRange` if `ended_at` is before
    /// `started_at`.
    pub fn close(
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Self, SessionWindowError> {
        if ended_at < started_at {
            return Err(SessionWindowError::InvalidTimeRange);
        }

        let duration_seconds = (ended_at - started_at).num_seconds().unsigned_abs();

        Ok(Self {
            started_at,
            ended_at,
            duration_seconds,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn window_floors_duration_to_seconds() {
        let start = fixed_now();
        let end = start + Duration::milliseconds(31_700);
        let window = SessionWindow::close(start, end).unwrap();

        assert_eq!(window.duration_seconds(), 31);
        assert_eq!(window.started_at(), start);
        assert_eq!(window.ended_at(), end);
    }

    #[test]
    fn zero_length_window_is_valid() {
        let now = fixed_now();
        let window = SessionWindow::close(now, now).unwrap();
        assert_eq!(window.duration_seconds(), 0);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let start = fixed_now();
        let err = SessionWindow::close(start, start - Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, SessionWindowError::InvalidTimeRange));
    }
}
