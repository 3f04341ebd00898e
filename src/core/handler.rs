//! Handler signatures for states and transitions.

use super::outcome::Outcome;
use super::state::StateName;

/// Error raised by a host handler. The engine aborts the run and hands it back
/// as the source of a `MachineError`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type HandlerResult<T> = Result<T, HandlerError>;

/// Handler invoked when its state becomes current.
///
/// Receives the previous state (absent on the first step of a run) and decides
/// what comes next.
pub type StateHandler = Box<dyn FnMut(Option<&StateName>) -> HandlerResult<Outcome> + Send>;

/// Side-effecting hook fired when control moves along a registered transition.
pub type TransitionHandler = Box<dyn FnMut() -> HandlerResult<()> + Send>;
