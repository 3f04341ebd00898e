//! Errors raised while running a machine.

use crate::core::{display_optional, HandlerError, StateName};
use crate::engine::execution::RunPhase;
use thiserror::Error;

/// Errors that abort a run. All of them leave the run in `RunPhase::Failed`,
/// except `NotConfigured` and `NotSuspended`, which reject the call before a
/// run is touched.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Machine is not configured: missing reserved state(s) {}", join_names(.missing))]
    NotConfigured { missing: Vec<StateName> },

    #[error("State '{target}' is not registered (returned from state '{from}')")]
    UnknownState { target: StateName, from: StateName },

    #[error("State '{state}' returned no next state; only 'end' may finish a run")]
    MissingNextState { state: StateName },

    #[error("Loop budget of {budget} iterations reached; check the configuration or the state handlers")]
    LoopBudgetExceeded { budget: usize },

    #[error("Cannot resume a machine in phase '{phase}'; only a suspended run can be resumed")]
    NotSuspended { phase: RunPhase },

    #[error("Handler of state '{state}' failed: {source}")]
    StateHandler {
        state: StateName,
        #[source]
        source: HandlerError,
    },

    #[error("Transition handler '{}' -> '{to}' failed: {source}", describe_from(.from))]
    TransitionHandler {
        from: Option<StateName>,
        to: StateName,
        #[source]
        source: HandlerError,
    },
}

fn describe_from(from: &Option<StateName>) -> String {
    display_optional(from.as_ref())
}

fn join_names(names: &[StateName]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unknown_state_names_target_and_source() {
        let error = MachineError::UnknownState {
            target: StateName::new("nonexistent"),
            from: StateName::new("middle"),
        };

        let message = error.to_string();
        assert!(message.contains("'nonexistent'"));
        assert!(message.contains("'middle'"));
    }

    #[test]
    fn not_configured_lists_every_missing_state() {
        let error = MachineError::NotConfigured {
            missing: vec![StateName::start(), StateName::end()],
        };

        assert_eq!(
            error.to_string(),
            "Machine is not configured: missing reserved state(s) 'start', 'end'"
        );
    }

    #[test]
    fn handler_error_is_exposed_as_source() {
        let error = MachineError::StateHandler {
            state: StateName::new("charge"),
            source: "card declined".into(),
        };

        assert_eq!(error.source().unwrap().to_string(), "card declined");
        assert!(error.to_string().contains("card declined"));
    }
}
