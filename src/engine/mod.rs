//! Execution engine.
//!
//! The engine owns a registry, the execution state of the current run and
//! its metrics. Each step of the loop:
//!
//! 1. counts the iteration against the loop budget,
//! 2. fires the transition hook registered for `current -> next`, if any,
//! 3. makes `next` the current state and records the entry,
//! 4. invokes the state's handler and resolves its `Outcome`.
//!
//! A handler returning `Outcome::Suspend` pauses the run; the host later calls
//! `resume` with the next state once the awaited work completes.

mod config;
mod error;
mod execution;
mod machine;

pub use config::{ConfigError, MachineConfig};
pub use error::MachineError;
pub use execution::{ExecutionState, MachineSnapshot, RunPhase};
pub use machine::Machine;
