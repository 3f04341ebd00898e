//! Registered transitions between two states.

use crate::core::{HandlerResult, StateName, TransitionHandler};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a transition: the ordered pair of state names it connects.
///
/// `from` is `None` for an entry transition, which matches the first step of a
/// run when no state is current yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub from: Option<StateName>,
    pub to: StateName,
}

impl TransitionKey {
    pub fn new(from: Option<StateName>, to: StateName) -> Self {
        Self { from, to }
    }

    pub fn is_self_transition(&self) -> bool {
        self.from.as_ref() == Some(&self.to)
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "'{from}' -> '{}'", self.to),
            None => write!(f, "'<none>' -> '{}'", self.to),
        }
    }
}

/// A side-effecting hook fired when control moves from `from` to `to`.
pub struct Transition {
    key: TransitionKey,
    handler: TransitionHandler,
}

impl Transition {
    pub fn new(key: TransitionKey, handler: TransitionHandler) -> Self {
        Self { key, handler }
    }

    pub fn key(&self) -> &TransitionKey {
        &self.key
    }

    pub fn from(&self) -> Option<&StateName> {
        self.key.from.as_ref()
    }

    pub fn to(&self) -> &StateName {
        &self.key.to
    }

    /// Check if this transition connects the given pair (pure)
    pub fn matches(&self, from: Option<&StateName>, to: &StateName) -> bool {
        self.key.from.as_ref() == from && &self.key.to == to
    }

    pub(crate) fn fire(&mut self) -> HandlerResult<()> {
        (self.handler)()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.key.from)
            .field("to", &self.key.to)
            .finish_non_exhaustive()
    }
}
