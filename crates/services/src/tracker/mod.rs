mod state;
mod workflow;

// Public API of the session tracking subsystem.
pub use state::{SessionTracker, TrackerConfig, TrackerPhase};
pub use workflow::{CloseTrigger, SessionTrackerService};
