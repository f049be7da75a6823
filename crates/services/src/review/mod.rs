mod runner;

// Public API of the flashcard review subsystem.
pub use runner::{ReviewRunner, ReviewScreen};
