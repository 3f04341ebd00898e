//! The step loop that drives a machine from `start` to `end`.

use crate::core::{display_optional, HandlerResult, Outcome, StateName};
use crate::engine::config::MachineConfig;
use crate::engine::error::MachineError;
use crate::engine::execution::{ExecutionState, MachineSnapshot, RunPhase};
use crate::metrics::{Metrics, TraceLog};
use crate::registry::{Registry, RegistryError, Transition};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, info_span, trace, warn};

/// An explicit finite state machine.
///
/// States and transitions are registered before [`start`](Machine::start).
/// A run then proceeds synchronously until it reaches `end`, a handler
/// suspends it, or it fails. A suspended run continues with
/// [`resume`](Machine::resume).
///
/// A machine is single-threaded: `start` and `resume` take `&mut self`, so a
/// host that shares an instance across threads must serialize those calls
/// itself. Handlers are `Send`, so the whole machine can be moved to another
/// thread between calls.
///
/// # Example
///
/// ```rust
/// use stepwise::core::Outcome;
/// use stepwise::engine::{Machine, MachineConfig};
///
/// let mut machine = Machine::new(MachineConfig::with_loop_budget(10));
/// machine.add_state("start", |_| Ok(Outcome::next("middle"))).unwrap();
/// machine.add_state("middle", |_| Ok(Outcome::next("end"))).unwrap();
/// machine.add_state("end", |_| Ok(Outcome::Done)).unwrap();
///
/// machine.start().unwrap();
///
/// assert!(machine.is_finished());
/// assert_eq!(machine.loop_counter(), 3);
/// ```
pub struct Machine {
    config: MachineConfig,
    registry: Registry,
    execution: ExecutionState,
    metrics: Metrics,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        Self::with_registry(config, Registry::new())
    }

    /// Create a machine around an already populated registry.
    pub fn with_registry(config: MachineConfig, registry: Registry) -> Self {
        Self {
            config,
            registry,
            execution: ExecutionState::new(),
            metrics: Metrics::new(config.loop_budget),
        }
    }

    /// Register a state handler. See [`Registry::add_state`].
    pub fn add_state<F>(&mut self, name: impl AsRef<str>, handler: F) -> Result<(), RegistryError>
    where
        F: FnMut(Option<&StateName>) -> HandlerResult<Outcome> + Send + 'static,
    {
        self.registry.add_state(name, handler)
    }

    /// Register a transition hook. See [`Registry::add_transition`].
    pub fn add_transition<F>(
        &mut self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.registry.add_transition(from, to, handler)
    }

    /// Register a hook fired on the first step of a run.
    /// See [`Registry::add_entry_transition`].
    pub fn add_entry_transition<F>(
        &mut self,
        to: impl AsRef<str>,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> HandlerResult<()> + Send + 'static,
    {
        self.registry.add_entry_transition(to, handler)
    }

    /// Look up a transition by (case-insensitive) names.
    pub fn find_transition(&self, from: Option<&str>, to: &str) -> Option<&Transition> {
        let from = from.map(StateName::new);
        self.registry
            .find_transition(from.as_ref(), &StateName::new(to))
    }

    pub fn is_runnable(&self) -> bool {
        self.registry.is_runnable()
    }

    /// Start a fresh run from `start`.
    ///
    /// Returns once the run reaches `end` or a handler suspends it. Any state
    /// of a previous run, suspended or not, is discarded; the registry and the
    /// host data bag are kept.
    pub fn start(&mut self) -> Result<(), MachineError> {
        let missing = self.registry.missing_reserved_states();
        if !missing.is_empty() {
            return Err(MachineError::NotConfigured { missing });
        }

        self.execution.reset();
        self.metrics.begin_run();

        let span = info_span!("machine_run", run_id = %self.metrics.run_id());
        let _entered = span.enter();
        info!(loop_budget = %self.config.loop_budget, "run started");

        self.drive(StateName::start())
    }

    /// Continue a suspended run with the given next state.
    ///
    /// The previous and current states and the loop counter carry over from
    /// the suspended step; a transition registered from the suspended state to
    /// `next` fires before `next` is entered.
    pub fn resume(&mut self, next: impl AsRef<str>) -> Result<(), MachineError> {
        let suspended_in = match (self.execution.phase, &self.execution.current) {
            (RunPhase::Suspended, Some(current)) => current.clone(),
            _ => {
                return Err(MachineError::NotSuspended {
                    phase: self.phase(),
                })
            }
        };
        let target = StateName::new(next);

        let span = info_span!("machine_run", run_id = %self.metrics.run_id());
        let _entered = span.enter();

        if !self.registry.contains_state(&target) {
            self.execution.phase = RunPhase::Failed;
            warn!(state = %suspended_in, next = %target, "resume target is not registered");
            return Err(MachineError::UnknownState {
                target,
                from: suspended_in,
            });
        }

        info!(state = %suspended_in, next = %target, "run resumed");
        self.execution.phase = RunPhase::Running;
        self.drive(target)
    }

    fn drive(&mut self, seed: StateName) -> Result<(), MachineError> {
        self.execution.next = Some(seed);

        let result = match self.step_loop() {
            Ok(()) => self.check_budget(),
            Err(error) => Err(error),
        };

        if let Err(error) = &result {
            self.execution.phase = RunPhase::Failed;
            warn!(%error, iterations = self.metrics.loop_counter(), "run failed");
        }
        result
    }

    fn step_loop(&mut self) -> Result<(), MachineError> {
        while !self.execution.finished && !self.metrics.guard().is_exhausted() {
            let Some(target) = self.execution.next.take() else {
                break;
            };
            let iteration = self.metrics.guard_mut().tick();

            // Transition hooks run before the state shift they belong to.
            let from = self.execution.current.clone();
            if let Some(transition) = self.registry.find_transition_mut(from.as_ref(), &target) {
                self.metrics
                    .trace_mut()
                    .transition_fired(from.clone(), target.clone(), iteration);
                debug!(
                    from = %display_optional(from.as_ref()),
                    to = %target,
                    iteration,
                    "transition fired"
                );
                transition
                    .fire()
                    .map_err(|source| MachineError::TransitionHandler {
                        from: from.clone(),
                        to: target.clone(),
                        source,
                    })?;
            }

            self.execution.previous = self.execution.current.replace(target.clone());
            self.metrics
                .trace_mut()
                .state_entered(target.clone(), iteration);
            debug!(state = %target, iteration, "state entered");

            let handler = match self.registry.state_handler_mut(&target) {
                Some(handler) => handler,
                None => {
                    return Err(MachineError::UnknownState {
                        from: self.execution.previous.clone().unwrap_or_else(|| target.clone()),
                        target,
                    })
                }
            };
            let outcome = handler(self.execution.previous.as_ref()).map_err(|source| {
                MachineError::StateHandler {
                    state: target.clone(),
                    source,
                }
            })?;

            match outcome {
                Outcome::Suspend => {
                    self.execution.phase = RunPhase::Suspended;
                    info!(state = %target, iteration, "run suspended");
                    break;
                }
                Outcome::Done if target.is_end() => {}
                Outcome::Done => return Err(MachineError::MissingNextState { state: target }),
                Outcome::Next(next) => {
                    if !self.registry.contains_state(&next) {
                        return Err(MachineError::UnknownState {
                            target: next,
                            from: target,
                        });
                    }
                    trace!(from = %target, to = %next, "next state resolved");
                    self.execution.next = Some(next);
                }
            }

            if target.is_end() {
                self.execution.finished = true;
                self.execution.phase = RunPhase::Finished;
                self.metrics.mark_finished();
                info!(
                    iterations = iteration,
                    duration = ?self.metrics.duration(),
                    "run finished"
                );
            }
        }
        Ok(())
    }

    /// A run that reached `end` is never failed by the budget, even when it
    /// finished on the last allowed iteration.
    fn check_budget(&self) -> Result<(), MachineError> {
        let guard = self.metrics.guard();
        if guard.is_exhausted() && !self.execution.finished {
            return Err(MachineError::LoopBudgetExceeded {
                budget: guard.limit(),
            });
        }
        Ok(())
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        match self.execution.phase {
            RunPhase::Ready if !self.registry.is_runnable() => RunPhase::Unconfigured,
            phase => phase,
        }
    }

    pub fn previous_status(&self) -> Option<&StateName> {
        self.execution.previous()
    }

    pub fn current_status(&self) -> Option<&StateName> {
        self.execution.current()
    }

    pub fn next_status(&self) -> Option<&StateName> {
        self.execution.next()
    }

    pub fn is_finished(&self) -> bool {
        self.execution.is_finished()
    }

    pub fn is_suspended(&self) -> bool {
        self.execution.phase == RunPhase::Suspended
    }

    pub fn loop_counter(&self) -> usize {
        self.metrics.loop_counter()
    }

    pub fn trace(&self) -> &TraceLog {
        self.metrics.trace()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn execution(&self) -> &ExecutionState {
        &self.execution
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Duration of the last run, once it reached `end`.
    pub fn duration(&self) -> Option<Duration> {
        self.metrics.duration()
    }

    /// Time since the current run started.
    pub fn elapsed(&self) -> Duration {
        self.metrics.elapsed()
    }

    /// Host data bag. The engine never touches it.
    pub fn data(&self) -> &Map<String, Value> {
        &self.execution.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.execution.data
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            run_id: self.metrics.run_id(),
            phase: self.phase(),
            previous: self.execution.previous.clone(),
            current: self.execution.current.clone(),
            finished: self.execution.finished,
            loop_counter: self.metrics.loop_counter(),
            loop_limit: self.metrics.guard().limit(),
            started_at: self.metrics.started_at(),
            finished_at: self.metrics.finished_at(),
            trace: self.metrics.trace().clone(),
            data: self.execution.data.clone(),
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("execution", &self.execution)
            .field("loop_counter", &self.metrics.loop_counter())
            .finish()
    }
}
