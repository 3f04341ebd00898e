//! Build errors for the machine builder.

use crate::core::StateName;
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Machine is not runnable: register {} before .build()", quoted(.missing))]
    NotRunnable { missing: Vec<StateName> },
}

fn quoted(names: &[StateName]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}
