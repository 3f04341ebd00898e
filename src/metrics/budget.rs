//! Loop budget and the runaway-loop guard.
//!
//! The guard counts step iterations and compares them against a limit. A
//! bounded budget fixes the limit; an unbounded budget keeps the limit one
//! step ahead of the counter, so it never trips on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// Maximum number of step iterations a run may take.
///
/// # Example
///
/// ```rust
/// use stepwise::metrics::LoopBudget;
///
/// assert_eq!(LoopBudget::from_limit(0), LoopBudget::Unbounded);
/// assert_eq!(LoopBudget::from_limit(99).limit(), Some(99));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopBudget {
    /// Fixed number of iterations.
    Bounded(NonZeroUsize),

    /// Limit follows the counter, always one step ahead.
    #[default]
    Unbounded,
}

impl LoopBudget {
    /// Build a budget from a plain limit. Zero means unbounded.
    pub fn from_limit(limit: usize) -> Self {
        match NonZeroUsize::new(limit) {
            Some(limit) => Self::Bounded(limit),
            None => Self::Unbounded,
        }
    }

    /// The fixed limit, if any.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Bounded(limit) => Some(limit.get()),
            Self::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl fmt::Display for LoopBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(limit) => write!(f, "{limit}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Iteration counter checked against the effective loop limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopGuard {
    budget: LoopBudget,
    counter: usize,
    limit: usize,
}

impl LoopGuard {
    pub fn new(budget: LoopBudget) -> Self {
        Self {
            budget,
            counter: 0,
            limit: Self::initial_limit(budget),
        }
    }

    fn initial_limit(budget: LoopBudget) -> usize {
        budget.limit().unwrap_or(1)
    }

    /// Reset counter and limit for a fresh run.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.limit = Self::initial_limit(self.budget);
    }

    /// Count one iteration. In unbounded mode the limit moves to `counter + 1`.
    pub fn tick(&mut self) -> usize {
        self.counter += 1;
        if self.budget.is_unbounded() {
            self.limit = self.counter + 1;
        }
        self.counter
    }

    /// True once the counter has reached the effective limit.
    pub fn is_exhausted(&self) -> bool {
        self.counter >= self.limit
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn budget(&self) -> LoopBudget {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_guard_exhausts_at_limit() {
        let mut guard = LoopGuard::new(LoopBudget::from_limit(3));

        assert!(!guard.is_exhausted());
        guard.tick();
        guard.tick();
        assert!(!guard.is_exhausted());
        guard.tick();
        assert!(guard.is_exhausted());
        assert_eq!(guard.counter(), 3);
        assert_eq!(guard.limit(), 3);
    }

    #[test]
    fn unbounded_guard_stays_one_ahead() {
        let mut guard = LoopGuard::new(LoopBudget::Unbounded);
        assert_eq!(guard.limit(), 1);

        for expected in 1..=1_000 {
            assert_eq!(guard.tick(), expected);
            assert_eq!(guard.limit(), expected + 1);
            assert!(!guard.is_exhausted());
        }
    }

    #[test]
    fn reset_restores_initial_limit() {
        let mut guard = LoopGuard::new(LoopBudget::Unbounded);
        guard.tick();
        guard.tick();

        guard.reset();

        assert_eq!(guard.counter(), 0);
        assert_eq!(guard.limit(), 1);
    }

    #[test]
    fn budget_serializes_as_snake_case() {
        let json = serde_json::to_string(&LoopBudget::from_limit(10)).unwrap();
        assert_eq!(json, r#"{"bounded":10}"#);

        let json = serde_json::to_string(&LoopBudget::Unbounded).unwrap();
        assert_eq!(json, r#""unbounded""#);
    }

    #[test]
    fn zero_bounded_budget_is_rejected_by_deserializer() {
        let result: Result<LoopBudget, _> = serde_json::from_str(r#"{"bounded":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn default_budget_is_unbounded() {
        assert_eq!(LoopBudget::default(), LoopBudget::Unbounded);
        assert_eq!(LoopBudget::default().to_string(), "unbounded");
    }
}
