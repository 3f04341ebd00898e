//! Named state handlers and transition hooks.
//!
//! The registry is filled during a configuration phase before a run starts.
//! State names are unique after case normalization, and transitions are
//! unique per ordered `(from, to)` pair. Self-transitions are allowed.
//!
//! # Example
//!
//! ```rust
//! use stepwise::core::Outcome;
//! use stepwise::registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry.add_state("start", |_| Ok(Outcome::next("end"))).unwrap();
//! assert!(!registry.is_runnable());
//!
//! registry.add_state("End", |_| Ok(Outcome::Done)).unwrap();
//! assert!(registry.is_runnable());
//!
//! assert!(registry.add_state("END", |_| Ok(Outcome::Done)).is_err());
//! ```

pub mod error;
pub mod transition;

pub use error::RegistryError;
pub use transition::{Transition, TransitionKey};

use crate::core::{HandlerResult, Outcome, StateHandler, StateName};
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Owned collection of state handlers and transitions for one machine.
#[derive(Default)]
pub struct Registry {
    states: HashMap<StateName, StateHandler>,
    transitions: Vec<Transition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state handler.
    ///
    /// Fails with `DuplicateState` if a state with the same normalized name
    /// already exists; the existing handler is kept.
    pub fn add_state<F>(&mut self, name: impl AsRef<str>, handler: F) -> Result<(), RegistryError>
    where
        F: FnMut(Option<&StateName>) -> HandlerResult<Outcome> + Send + 'static,
    {
        let name = StateName::new(name);
        if self.states.contains_key(&name) {
            return Err(RegistryError::DuplicateState { name });
        }
        self.states.insert(name, Box::new(handler));
        Ok(())
    }

    /// Register a transition hook between two states.
    pub fn add_transition<F>(
        &mut self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.insert_transition(Some(StateName::new(from)), StateName::new(to), handler)
    }

    /// Register a transition hook with no source state.
    ///
    /// It fires on the first step of a run, before its target state is
    /// entered, because nothing is current at that point.
    pub fn add_entry_transition<F>(
        &mut self,
        to: impl AsRef<str>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.insert_transition(None, StateName::new(to), handler)
    }

    fn insert_transition<F>(
        &mut self,
        from: Option<StateName>,
        to: StateName,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        if self.find_transition(from.as_ref(), &to).is_some() {
            return Err(RegistryError::DuplicateTransition { from, to });
        }
        self.transitions
            .push(Transition::new(TransitionKey::new(from, to), Box::new(handler)));
        Ok(())
    }

    /// Find the transition registered for an ordered pair (pure).
    pub fn find_transition(&self, from: Option<&StateName>, to: &StateName) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(from, to))
    }

    pub(crate) fn find_transition_mut(
        &mut self,
        from: Option<&StateName>,
        to: &StateName,
    ) -> Option<&mut Transition> {
        self.transitions.iter_mut().find(|t| t.matches(from, to))
    }

    pub(crate) fn state_handler_mut(&mut self, name: &StateName) -> Option<&mut StateHandler> {
        self.states.get_mut(name)
    }

    pub fn contains_state(&self, name: &StateName) -> bool {
        self.states.contains_key(name)
    }

    /// Registered state names in sorted order.
    pub fn state_names(&self) -> Vec<&StateName> {
        let mut names: Vec<&StateName> = self.states.keys().collect();
        names.sort();
        names
    }

    /// Registered transitions in registration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Check that both reserved states are registered.
    ///
    /// Accumulates every missing reserved state instead of stopping at the
    /// first one.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RegistryError>> {
        let checks: Vec<Validation<(), NonEmptyVec<RegistryError>>> =
            [StateName::start(), StateName::end()]
                .into_iter()
                .map(|name| {
                    if self.states.contains_key(&name) {
                        Validation::success(())
                    } else {
                        Validation::fail(RegistryError::MissingReservedState { name })
                    }
                })
                .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// True iff both `start` and `end` are registered.
    pub fn is_runnable(&self) -> bool {
        self.validate().is_success()
    }

    /// Reserved states that still need to be registered.
    pub fn missing_reserved_states(&self) -> Vec<StateName> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors
                .iter()
                .filter_map(|e| match e {
                    RegistryError::MissingReservedState { name } => Some(name.clone()),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("states", &self.state_names())
            .field("transitions", &self.transitions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(_: Option<&StateName>) -> HandlerResult<Outcome> {
        Ok(Outcome::Done)
    }

    #[test]
    fn duplicate_state_differing_by_case_is_rejected() {
        let mut registry = Registry::new();
        registry.add_state("Review", done).unwrap();

        let result = registry.add_state("REVIEW", done);

        assert_eq!(
            result,
            Err(RegistryError::DuplicateState {
                name: StateName::new("review")
            })
        );
        assert_eq!(registry.state_count(), 1);
    }

    #[test]
    fn duplicate_transition_differing_by_case_is_rejected() {
        let mut registry = Registry::new();
        registry.add_transition("a", "b", || Ok(())).unwrap();

        let result = registry.add_transition("A", "B", || Ok(()));

        assert!(matches!(
            result,
            Err(RegistryError::DuplicateTransition { .. })
        ));
        assert_eq!(registry.transition_count(), 1);
    }

    #[test]
    fn reverse_pair_is_a_different_transition() {
        let mut registry = Registry::new();
        registry.add_transition("a", "b", || Ok(())).unwrap();
        registry.add_transition("b", "a", || Ok(())).unwrap();

        assert_eq!(registry.transition_count(), 2);
    }

    #[test]
    fn self_transition_is_allowed() {
        let mut registry = Registry::new();
        registry.add_transition("poll", "poll", || Ok(())).unwrap();

        let poll = StateName::new("poll");
        let found = registry.find_transition(Some(&poll), &poll).unwrap();
        assert!(found.key().is_self_transition());
    }

    #[test]
    fn entry_transition_is_unique_per_target() {
        let mut registry = Registry::new();
        registry.add_entry_transition("start", || Ok(())).unwrap();

        assert!(registry.add_entry_transition("Start", || Ok(())).is_err());
        assert!(registry.add_transition("start", "start", || Ok(())).is_ok());
    }

    #[test]
    fn find_transition_returns_none_for_unknown_pair() {
        let registry = Registry::new();
        assert!(registry
            .find_transition(Some(&StateName::new("x")), &StateName::new("y"))
            .is_none());
    }

    #[test]
    fn validate_reports_every_missing_reserved_state() {
        let registry = Registry::new();

        match registry.validate() {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
        assert_eq!(
            registry.missing_reserved_states(),
            vec![StateName::start(), StateName::end()]
        );
    }

    #[test]
    fn start_alone_is_not_runnable() {
        let mut registry = Registry::new();
        registry.add_state("start", done).unwrap();

        assert!(!registry.is_runnable());
        assert_eq!(registry.missing_reserved_states(), vec![StateName::end()]);
    }

    #[test]
    fn end_alone_is_not_runnable() {
        let mut registry = Registry::new();
        registry.add_state("end", done).unwrap();

        assert!(!registry.is_runnable());
        assert_eq!(registry.missing_reserved_states(), vec![StateName::start()]);
    }

    #[test]
    fn start_and_end_make_registry_runnable() {
        let mut registry = Registry::new();
        registry.add_state("START", done).unwrap();
        registry.add_state("end", done).unwrap();

        assert!(registry.is_runnable());
        assert!(registry.validate().is_success());
        assert!(registry.missing_reserved_states().is_empty());
    }

    #[test]
    fn state_names_are_sorted() {
        let mut registry = Registry::new();
        registry.add_state("middle", done).unwrap();
        registry.add_state("end", done).unwrap();
        registry.add_state("start", done).unwrap();

        let names: Vec<&str> = registry.state_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["end", "middle", "start"]);
    }
}
