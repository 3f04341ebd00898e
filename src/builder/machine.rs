//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{HandlerResult, Outcome, StateName};
use crate::engine::{Machine, MachineConfig};
use crate::metrics::LoopBudget;
use crate::registry::Registry;

/// Builder for constructing machines with a fluent API.
pub struct MachineBuilder {
    config: MachineConfig,
    registry: Registry,
}

impl MachineBuilder {
    /// Create a new builder with the default (unbounded) configuration.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            registry: Registry::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the loop budget.
    pub fn loop_budget(mut self, budget: LoopBudget) -> Self {
        self.config.loop_budget = budget;
        self
    }

    /// Register a state.
    /// Returns an error if a state with the same name already exists.
    pub fn state<F>(mut self, name: impl AsRef<str>, handler: F) -> Result<Self, BuildError>
    where
        F: FnMut(Option<&StateName>) -> HandlerResult<Outcome> + Send + 'static,
    {
        self.registry.add_state(name, handler)?;
        Ok(self)
    }

    /// Register a transition hook.
    pub fn transition<F>(
        mut self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        handler: F,
    ) -> Result<Self, BuildError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.registry.add_transition(from, to, handler)?;
        Ok(self)
    }

    /// Register a hook fired on the first step of every run.
    pub fn entry_transition<F>(mut self, to: impl AsRef<str>, handler: F) -> Result<Self, BuildError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.registry.add_entry_transition(to, handler)?;
        Ok(self)
    }

    /// Build the machine.
    /// Returns an error if `start` or `end` is missing.
    pub fn build(self) -> Result<Machine, BuildError> {
        let missing = self.registry.missing_reserved_states();
        if !missing.is_empty() {
            return Err(BuildError::NotRunnable { missing });
        }

        Ok(Machine::with_registry(self.config, self.registry))
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
