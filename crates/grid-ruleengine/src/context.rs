//! Ambient call context threaded through rule execution.

use std::time::Instant;

/// Cancellation/deadline context passed to the engine.
///
/// The engine accepts it on every entry point but does not consult it;
/// callers that want to honour a deadline check [`Context::deadline`]
/// themselves between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// A context without a deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
