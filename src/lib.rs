//! Stepwise: an explicit finite state machine engine for backend workflows.
//!
//! A workflow is modelled as named states connected by optional transition
//! hooks. Every state has a handler that decides the next state; the engine
//! drives the run from the reserved `start` state to the reserved `end` state.
//!
//! # Core Concepts
//!
//! - **Registry**: case-insensitive state handlers and transition hooks
//! - **Engine**: the step loop, asynchronous suspension and resumption, and
//!   the runaway-loop guard
//! - **Metrics**: loop counter, chronological trace and run timing
//!
//! Trace events are emitted through [`tracing`]; install a subscriber to see
//! them.
//!
//! # Example
//!
//! ```rust
//! use stepwise::{Machine, MachineConfig, Outcome};
//!
//! let mut machine = Machine::new(MachineConfig::with_loop_budget(10));
//! machine.add_state("start", |_| Ok(Outcome::next("review"))).unwrap();
//! machine.add_state("review", |_| Ok(Outcome::Suspend)).unwrap();
//! machine.add_state("end", |_| Ok(Outcome::Done)).unwrap();
//!
//! machine.start().unwrap();
//! assert!(machine.is_suspended());
//!
//! // ... later, once the awaited work completed
//! machine.resume("end").unwrap();
//! assert!(machine.is_finished());
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod metrics;
pub mod registry;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::core::{HandlerError, HandlerResult, Outcome, StateName};
pub use crate::engine::{Machine, MachineConfig, MachineError, MachineSnapshot, RunPhase};
pub use crate::metrics::{LoopBudget, TraceEvent, TraceLog};
pub use crate::registry::{Registry, RegistryError};
