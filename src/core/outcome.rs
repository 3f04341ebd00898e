//! What a state handler decides after it runs.

use super::state::StateName;

/// Result of invoking a state handler.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{Outcome, StateName};
///
/// let outcome = Outcome::next("Review");
/// assert_eq!(outcome, Outcome::Next(StateName::new("review")));
/// assert!(Outcome::Suspend.is_suspend());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Continue with the named state.
    Next(StateName),

    /// Pause the run until the host calls `resume` with the next state.
    Suspend,

    /// No next state. Only the `end` state may return this.
    Done,
}

impl Outcome {
    /// Continue with the named state.
    pub fn next(name: impl AsRef<str>) -> Self {
        Self::Next(StateName::new(name))
    }

    pub fn is_suspend(&self) -> bool {
        matches!(self, Self::Suspend)
    }
}

impl From<StateName> for Outcome {
    fn from(name: StateName) -> Self {
        Self::Next(name)
    }
}
