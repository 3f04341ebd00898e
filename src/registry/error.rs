//! Registry errors.

use crate::core::{display_optional, StateName};
use thiserror::Error;

/// Errors raised while registering states and transitions, or while checking
/// that a registry is ready to run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("State '{name}' is already registered (state names are case-insensitive)")]
    DuplicateState { name: StateName },

    #[error(
        "Transition '{}' -> '{to}' is already registered (state names are case-insensitive)",
        describe_from(.from)
    )]
    DuplicateTransition {
        from: Option<StateName>,
        to: StateName,
    },

    #[error("Reserved state '{name}' is not registered")]
    MissingReservedState { name: StateName },
}

fn describe_from(from: &Option<StateName>) -> String {
    display_optional(from.as_ref())
}
