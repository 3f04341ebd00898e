//! Core types shared by the registry, metrics and engine.
//!
//! - `StateName`: normalized, case-insensitive state identifiers
//! - `Outcome`: what a state handler decides (next state, suspend, done)
//! - Handler type aliases for states and transitions

mod handler;
mod outcome;
mod state;

pub use handler::{HandlerError, HandlerResult, StateHandler, TransitionHandler};
pub use outcome::Outcome;
pub use state::{StateName, END, START};

pub(crate) use state::display_optional;
